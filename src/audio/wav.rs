use anyhow::{Context, Result};
use std::io::Cursor;

/// Encode raw PCM samples as an in-memory WAV file (16-bit int, uncompressed).
///
/// Pure function of its inputs; the buffer is handed straight to the
/// transcription client and never touches disk.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut buffer, spec).context("failed to create WAV writer")?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .context("failed to write sample to WAV buffer")?;
        }

        writer.finalize().context("failed to finalize WAV header")?;
    }

    Ok(buffer.into_inner())
}
