use crate::audio::pcm::AudioPcm;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// How a music track is matched to the video length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AudioFit {
    /// Repeat the track from its start until the target is filled.
    Loop,
    /// Keep the prefix of the track that covers the target.
    Trim,
}

/// `Loop` when the source is shorter than the target, `Trim` otherwise.
pub fn fit(source_secs: f64, target_secs: f64) -> AudioFit {
    if source_secs < target_secs {
        AudioFit::Loop
    } else {
        AudioFit::Trim
    }
}

/// Convert a frame count to the nearest sample frame at `sample_rate`.
pub fn frame_to_sample(frames: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frames) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

/// Loop or trim `pcm` to exactly `target_frames` sample frames.
pub fn apply_fit(pcm: &AudioPcm, target_frames: u64) -> ReelResult<AudioPcm> {
    let source_frames = pcm.frames();
    if source_frames == 0 {
        return Err(ReelError::audio("music track decoded to no samples"));
    }
    let channels = usize::from(pcm.channels);
    let target_len = usize::try_from(target_frames)
        .ok()
        .and_then(|f| f.checked_mul(channels))
        .ok_or_else(|| ReelError::audio("fitted audio length overflows"))?;
    let source = &pcm.interleaved_f32[..source_frames as usize * channels];

    let rate = f64::from(pcm.sample_rate);
    let decision = fit(source_frames as f64 / rate, target_frames as f64 / rate);
    tracing::debug!(?decision, source_frames, target_frames, "fitting music track");

    let interleaved_f32 = match decision {
        AudioFit::Loop => source.iter().copied().cycle().take(target_len).collect(),
        AudioFit::Trim => source[..target_len].to_vec(),
    };
    Ok(AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/fit.rs"]
mod tests;
