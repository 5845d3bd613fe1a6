//! Presentation layer: a pure mapping from session state to what is shown.

use std::fmt;
use serde::Serialize;
use crate::commands::download_name;
use crate::core::presets::params_for;
use crate::core::{Phase, Preset, QualityPercent, SessionSnapshot};
use crate::utils::format_bytes_default;

/// One selectable preset, as listed in the configure view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetOption {
    pub preset: Preset,
    pub selected: bool,
    pub label: String,
}

/// Everything one of the three screens displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View {
    Upload {
        error: Option<String>,
    },
    Configure {
        file_name: String,
        file_size: String,
        preview_url: String,
        presets: Vec<PresetOption>,
        /// Only present while the custom preset is selected
        custom_quality: Option<u8>,
        compressing: bool,
        progress: Option<u8>,
    },
    Done {
        original_size: String,
        compressed_size: String,
        saved: String,
        saved_percent: i64,
        original_preview: String,
        compressed_preview: String,
        download_name: String,
    },
}

/// Builds the view for `snapshot`.
pub fn render(snapshot: &SessionSnapshot) -> View {
    match (snapshot.phase, &snapshot.original, &snapshot.compressed, &snapshot.summary) {
        (Phase::Configure, Some(original), _, _) => View::Configure {
            file_name: original.name.clone(),
            file_size: format_bytes_default(original.size),
            preview_url: original.preview_url.clone(),
            presets: preset_options(snapshot.preset),
            custom_quality: (snapshot.preset == Preset::Custom).then_some(snapshot.custom_quality),
            compressing: snapshot.is_compressing,
            progress: snapshot.progress,
        },
        (Phase::Done, Some(original), Some(compressed), Some(summary)) => View::Done {
            original_size: format_bytes_default(summary.original_size),
            compressed_size: format_bytes_default(summary.compressed_size),
            saved: format_signed_bytes(summary.saved_bytes),
            saved_percent: summary.saved_percent,
            original_preview: original.preview_url.clone(),
            compressed_preview: compressed.preview_url.clone(),
            download_name: download_name(&original.name),
        },
        _ => View::Upload {
            error: snapshot.error_message.clone(),
        },
    }
}

fn preset_options(selected: Preset) -> Vec<PresetOption> {
    Preset::ALL
        .into_iter()
        .map(|preset| PresetOption {
            preset,
            selected: preset == selected,
            label: preset_label(preset),
        })
        .collect()
}

fn preset_label(preset: Preset) -> String {
    match preset {
        Preset::Custom => "custom (up to 2 MB, your quality)".to_string(),
        fixed => {
            let params = params_for(fixed, QualityPercent::default());
            format!(
                "{} (up to {} MB, quality {}%)",
                fixed,
                params.max_size_mb,
                (params.initial_quality * 100.0).round()
            )
        }
    }
}

fn format_signed_bytes(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_bytes_default(bytes.unsigned_abs()))
    } else {
        format_bytes_default(bytes.unsigned_abs())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Upload { error } => {
                writeln!(f, "Select a JPG, PNG or WebP image (open <path>)")?;
                if let Some(error) = error {
                    writeln!(f, "! {error}")?;
                }
            }
            View::Configure {
                file_name,
                file_size,
                preview_url,
                presets,
                custom_quality,
                compressing,
                progress,
            } => {
                writeln!(f, "{file_name} ({file_size}) [{preview_url}]")?;
                for option in presets {
                    let mark = if option.selected { "*" } else { " " };
                    writeln!(f, " {mark} {}", option.label)?;
                }
                if let Some(quality) = custom_quality {
                    writeln!(f, "   quality: {quality}% (quality <1-100>)")?;
                }
                if *compressing {
                    writeln!(f, "Compressing... {}%", progress.unwrap_or(0))?;
                } else {
                    writeln!(f, "preset <name> | compress")?;
                }
            }
            View::Done {
                original_size,
                compressed_size,
                saved,
                saved_percent,
                original_preview,
                compressed_preview,
                download_name,
            } => {
                writeln!(f, "Original:   {original_size} [{original_preview}]")?;
                writeln!(f, "Compressed: {compressed_size} [{compressed_preview}]")?;
                writeln!(f, "Saved {saved} ({saved_percent}%)")?;
                writeln!(f, "download [dir] -> {download_name} | reset")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CompressionSummary, FileInfo};

    fn file(name: &str, size: u64, url: &str) -> FileInfo {
        FileInfo {
            name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            size,
            preview_url: url.to_string(),
        }
    }

    fn snapshot(phase: Phase) -> SessionSnapshot {
        SessionSnapshot {
            phase,
            preset: Preset::Medium,
            custom_quality: 70,
            error_message: None,
            is_compressing: false,
            progress: None,
            original: None,
            compressed: None,
            summary: None,
        }
    }

    #[test]
    fn upload_shows_error() {
        let mut s = snapshot(Phase::Upload);
        s.error_message = Some("bad".into());
        let view = render(&s);
        assert_eq!(view, View::Upload { error: Some("bad".into()) });
        assert!(view.to_string().contains("! bad"));
    }

    #[test]
    fn custom_quality_only_with_custom_preset() {
        let mut s = snapshot(Phase::Configure);
        s.original = Some(file("a.jpg", 1536, "preview://1"));

        let View::Configure { custom_quality, presets, file_size, .. } = render(&s) else {
            panic!("expected configure view");
        };
        assert_eq!(custom_quality, None);
        assert_eq!(file_size, "1.5 KB");
        assert_eq!(presets.iter().filter(|p| p.selected).count(), 1);
        assert_eq!(presets[1].label, "medium (up to 0.5 MB, quality 60%)");

        s.preset = Preset::Custom;
        s.custom_quality = 35;
        let View::Configure { custom_quality, .. } = render(&s) else {
            panic!("expected configure view");
        };
        assert_eq!(custom_quality, Some(35));
    }

    #[test]
    fn done_shows_savings() {
        let mut s = snapshot(Phase::Done);
        s.original = Some(file("big.jpg", 2_097_152, "preview://1"));
        s.compressed = Some(file("big.jpg", 150_000, "preview://2"));
        s.summary = Some(CompressionSummary::new(2_097_152, 150_000));

        let view = render(&s);
        let text = view.to_string();
        assert!(text.contains("Original:   2 MB"));
        assert!(text.contains("Compressed: 146.48 KB"));
        assert!(text.contains("Saved 1.86 MB (93%)"));
        assert!(text.contains("compressed-big.jpg"));
    }

    #[test]
    fn growth_is_shown_negative() {
        assert_eq!(format_signed_bytes(-1024), "-1 KB");
        assert_eq!(format_signed_bytes(0), "0 Bytes");
    }
}
