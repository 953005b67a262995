//! 16-bit mono PCM WAV output

use crate::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// WAV format for a synthesized clip
pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write `samples` as a mono 16-bit WAV file, replacing any existing file
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[i16], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
