//! Preset definitions and argument templates.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named transcoding operation.
///
/// The set is closed: every preset the system supports is a variant here,
/// and its argument template is a pure function of the input and output
/// paths. Templates perform no I/O and have no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Scale to 1280x720, H.264, CRF 23.
    ReduceResolution,
    /// Target video bitrate 1000k, H.264.
    ReduceBitrate,
    /// H.264, CRF 28, slow encoder preset.
    ConstantRateFactor,
    /// Re-encode video as H.265, CRF 28.
    CodecH265,
    /// Force 24 fps, H.264, CRF 23.
    LowerFrameRate,
    /// Strip the audio stream, H.264, CRF 23.
    RemoveAudio,
    /// H.265, CRF 30, slower encoder preset, 64k audio.
    MaximumCompression,
}

impl Preset {
    /// Every preset, in catalog order.
    pub const ALL: &'static [Preset] = &[
        Preset::ReduceResolution,
        Preset::ReduceBitrate,
        Preset::ConstantRateFactor,
        Preset::CodecH265,
        Preset::LowerFrameRate,
        Preset::RemoveAudio,
        Preset::MaximumCompression,
    ];

    /// The catalog tag for this preset.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ReduceResolution => "Reduce Resolution",
            Self::ReduceBitrate => "Reduce Bitrate",
            Self::ConstantRateFactor => "Use Constant Rate Factor (CRF)",
            Self::CodecH265 => "Change Codec to H.265",
            Self::LowerFrameRate => "Lower Frame Rate",
            Self::RemoveAudio => "Remove Audio",
            Self::MaximumCompression => "Maximum Compression",
        }
    }

    /// Whether the encoder's per-frame output lines should drive progress
    /// reporting for this preset. True for every current preset; kept per
    /// preset so a stream-copy style operation can opt out later.
    pub fn reports_frame_progress(&self) -> bool {
        true
    }

    /// Builds the full argument vector for the external encoder:
    /// `["-i", input, <preset flags>, output]`.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = vec!["-i".to_string(), input.to_string_lossy().to_string()];
        args.extend(self.flags().iter().map(|s| s.to_string()));
        args.push(output.to_string_lossy().to_string());
        args
    }

    /// The preset-specific flag fragment of the argument template.
    fn flags(&self) -> &'static [&'static str] {
        match self {
            Self::ReduceResolution => &[
                "-vf", "scale=1280:720", "-c:v", "libx264", "-crf", "23", "-preset", "medium",
                "-c:a", "aac", "-b:a", "128k",
            ],
            Self::ReduceBitrate => &[
                "-b:v", "1000k", "-c:v", "libx264", "-preset", "medium", "-c:a", "aac", "-b:a",
                "128k",
            ],
            Self::ConstantRateFactor => &[
                "-c:v", "libx264", "-crf", "28", "-preset", "slow", "-c:a", "aac", "-b:a", "128k",
            ],
            Self::CodecH265 => &[
                "-c:v", "libx265", "-crf", "28", "-preset", "medium", "-c:a", "aac", "-b:a",
                "128k",
            ],
            Self::LowerFrameRate => &[
                "-r", "24", "-c:v", "libx264", "-crf", "23", "-preset", "medium", "-c:a", "aac",
                "-b:a", "128k",
            ],
            Self::RemoveAudio => &["-an", "-c:v", "libx264", "-crf", "23", "-preset", "medium"],
            Self::MaximumCompression => &[
                "-c:v", "libx265", "-crf", "30", "-preset", "slower", "-c:a", "aac", "-b:a",
                "64k",
            ],
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_shape() {
        let args = Preset::RemoveAudio.args(Path::new("/in/a.mkv"), Path::new("/out/a.mp4"));
        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/in/a.mkv");
        assert_eq!(args.last().unwrap(), "/out/a.mp4");
    }

    #[test]
    fn test_reduce_resolution_flags() {
        let args = Preset::ReduceResolution.args(Path::new("in.mp4"), Path::new("out.mp4"));
        assert!(args.contains(&"-vf".to_string()));
        assert!(args.contains(&"scale=1280:720".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"23".to_string()));
    }

    #[test]
    fn test_reduce_bitrate_flags() {
        let args = Preset::ReduceBitrate.args(Path::new("in.mp4"), Path::new("out.mp4"));
        assert!(args.contains(&"-b:v".to_string()));
        assert!(args.contains(&"1000k".to_string()));
        // Bitrate-based, not CRF-based
        assert!(!args.contains(&"-crf".to_string()));
    }

    #[test]
    fn test_remove_audio_strips_audio() {
        let args = Preset::RemoveAudio.args(Path::new("in.mp4"), Path::new("out.mp4"));
        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"aac".to_string()));
    }

    #[test]
    fn test_h265_presets_use_libx265() {
        for preset in [Preset::CodecH265, Preset::MaximumCompression] {
            let args = preset.args(Path::new("in.mp4"), Path::new("out.mp4"));
            assert!(args.contains(&"libx265".to_string()), "{preset}");
        }
    }

    #[test]
    fn test_maximum_compression_lowers_audio_bitrate() {
        let args = Preset::MaximumCompression.args(Path::new("in.mp4"), Path::new("out.mp4"));
        assert!(args.contains(&"slower".to_string()));
        assert!(args.contains(&"64k".to_string()));
        assert!(args.contains(&"30".to_string()));
    }

    #[test]
    fn test_lower_frame_rate_forces_24_fps() {
        let args = Preset::LowerFrameRate.args(Path::new("in.mp4"), Path::new("out.mp4"));
        let r = args.iter().position(|a| a == "-r").unwrap();
        assert_eq!(args[r + 1], "24");
    }

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<_> = Preset::ALL.iter().map(|p| p.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), Preset::ALL.len());
    }

    #[test]
    fn test_all_presets_report_frame_progress() {
        for preset in Preset::ALL {
            assert!(preset.reports_frame_progress());
        }
    }
}
