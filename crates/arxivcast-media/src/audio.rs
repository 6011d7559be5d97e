//! WAV helpers for the voice stage.

use std::path::Path;

use crate::error::MediaResult;

/// Write `secs` of 16-bit mono silence at `sample_rate`.
///
/// The terminal voice fallback: always succeeds if the disk does, so every
/// item that still has a poster can reach the video stage.
pub fn write_silence_wav(path: impl AsRef<Path>, secs: u32, sample_rate: u32) -> MediaResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for _ in 0..(secs * sample_rate) {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Duration of a WAV file in seconds, read from the header.
pub fn wav_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    // duration() counts samples per channel
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}

/// Quick structural check that `bytes` open a RIFF/WAVE stream.
///
/// Used to reject HTTP backends that answer 200 with an HTML error page.
pub fn looks_like_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}
