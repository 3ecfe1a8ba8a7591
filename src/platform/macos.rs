// ── macOS provider ────────────────────────────────────────────────────────────
//
// Everything goes through the stock query tools (`sysctl`,
// `system_profiler`); no Objective-C bridging.  Parsing lives in pure
// functions tested against captured profiler output.

use crate::display::Rotation;
use crate::error::{CaliperError, Result};
use crate::host::{DeviceIdentity, DisplayInfoProvider};
use crate::platform::query_tool;

/// Provider backed by `sysctl` and `system_profiler`.
#[derive(Debug, Clone, Default)]
pub struct MacosDisplay;

impl DisplayInfoProvider for MacosDisplay {
    fn device_identity(&self) -> Result<DeviceIdentity> {
        let model = match query_tool("sysctl", &["-n", "hw.model"], "device identity") {
            Ok(out) if !out.trim().is_empty() => out.trim().to_owned(),
            // Sandboxed processes may not read hw.model; the profiler
            // reports the same identifier.
            _ => profiler_model()?,
        };
        Ok(DeviceIdentity::new("Apple", model))
    }

    fn density_scale(&self) -> Result<f32> {
        let output = query_tool("system_profiler", &["SPDisplaysDataType"], "display")?;
        parse_display_scale(&output).ok_or(CaliperError::Parse {
            what: "system_profiler output",
        })
    }

    fn rotation(&self) -> Result<Rotation> {
        let output = query_tool("system_profiler", &["SPDisplaysDataType"], "display")?;
        Ok(parse_display_rotation(&output))
    }
}

fn profiler_model() -> Result<String> {
    let output = query_tool("system_profiler", &["SPHardwareDataType"], "device identity")?;
    parse_model_identifier(&output).ok_or(CaliperError::Parse {
        what: "system_profiler output",
    })
}

/// `SPHardwareDataType` carries one `Model Identifier:` line per machine.
fn parse_model_identifier(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|l| l.trim().strip_prefix("Model Identifier:"))
        .map(|v| v.trim().to_owned())
}

/// One display block of `SPDisplaysDataType` output.  A block opens at its
/// `Resolution:` line; the indented lines that follow belong to it until
/// the next display's `Resolution:` line.
#[derive(Debug, Default)]
struct DisplayBlock {
    backing_width: Option<f32>,
    retina: bool,
    ui_width: Option<f32>,
    main: bool,
    rotation: Rotation,
}

fn parse_display_blocks(output: &str) -> Vec<DisplayBlock> {
    let mut blocks: Vec<DisplayBlock> = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix("Resolution:") {
            blocks.push(DisplayBlock {
                backing_width: first_number(v),
                retina: v.contains("Retina"),
                ..Default::default()
            });
        } else if let Some(block) = blocks.last_mut() {
            if let Some(v) = line.strip_prefix("UI Looks like:") {
                block.ui_width = first_number(v);
            } else if let Some(v) = line.strip_prefix("Main Display:") {
                block.main = v.trim() == "Yes";
            } else if let Some(v) = line.strip_prefix("Rotation:") {
                block.rotation = match v.trim().trim_end_matches('°') {
                    "90" => Rotation::Deg90,
                    "180" => Rotation::Deg180,
                    "270" => Rotation::Deg270,
                    // "Supported", "Off", anything else.
                    _ => Rotation::Deg0,
                };
            }
        }
    }
    blocks
}

/// The block queries answer from: the display marked `Main Display: Yes`,
/// or the first listed when none is marked.
fn main_display(blocks: &[DisplayBlock]) -> Option<&DisplayBlock> {
    blocks.iter().find(|b| b.main).or_else(|| blocks.first())
}

/// Derive the main display's scale factor from `SPDisplaysDataType`:
///
/// ```text
///     Resolution: 2880 x 1800 Retina
///     UI Looks like: 1440 x 900 @ 60.00Hz
/// ```
///
/// The backing/UI width ratio is the scale; a Retina marker with no
/// "UI Looks like" line means the standard 2x, anything else is 1x.
/// Widths are only ever paired within one display's block, so a second
/// display's UI line can never combine with the first display's backing
/// width.
fn parse_display_scale(output: &str) -> Option<f32> {
    let blocks = parse_display_blocks(output);
    let block = main_display(&blocks)?;
    let backing = block.backing_width?;
    match block.ui_width {
        Some(ui) if ui > 0.0 => Some(backing / ui),
        _ if block.retina => Some(2.0),
        _ => Some(1.0),
    }
}

/// `Rotation:` names the angle when a display is turned; `Supported` (or
/// no line at all) means it sits in its natural orientation.  Read from
/// the main display's block.
fn parse_display_rotation(output: &str) -> Rotation {
    let blocks = parse_display_blocks(output);
    main_display(&blocks).map(|b| b.rotation).unwrap_or_default()
}

fn first_number(s: &str) -> Option<f32> {
    s.split_whitespace().next()?.parse().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAYS_RETINA: &str = "\
Graphics/Displays:

    Apple M1 Pro:

      Chipset Model: Apple M1 Pro
      Type: GPU
      Displays:
        Color LCD:
          Display Type: Built-In Liquid Retina XDR Display
          Resolution: 3024 x 1964 Retina
          Main Display: Yes
          Mirror: Off
          Online: Yes
          Automatically Adjust Brightness: Yes
";

    const DISPLAYS_SCALED: &str = "\
      Displays:
        Color LCD:
          Resolution: 2880 x 1800 Retina
          UI Looks like: 1440 x 900 @ 60.00Hz
          Main Display: Yes
";

    const DISPLAYS_EXTERNAL: &str = "\
      Displays:
        DELL U2415:
          Resolution: 1920 x 1200 (WUXGA - Widescreen Ultra Extended Graphics Array)
          UI Looks like: 1920 x 1200 @ 60.00Hz
          Rotation: Supported
          Main Display: Yes
";

    const DISPLAYS_DUAL: &str = "\
      Displays:
        Color LCD:
          Display Type: Built-In Liquid Retina XDR Display
          Resolution: 3024 x 1964 Retina
          Main Display: Yes
          Mirror: Off
        DELL P2415Q:
          Resolution: 3840 x 2160 (2160p/4K UHD 1)
          UI Looks like: 1920 x 1080 @ 60.00Hz
          Rotation: 90
          Mirror: Off
";

    const HARDWARE: &str = "\
Hardware:

    Hardware Overview:

      Model Name: MacBook Pro
      Model Identifier: MacBookPro18,3
      Chip: Apple M1 Pro
      Total Number of Cores: 8 (6 performance and 2 efficiency)
      Memory: 16 GB
";

    #[test]
    fn retina_without_ui_line_is_2x() {
        assert_eq!(parse_display_scale(DISPLAYS_RETINA), Some(2.0));
    }

    #[test]
    fn scale_comes_from_backing_over_ui_width() {
        assert_eq!(parse_display_scale(DISPLAYS_SCALED), Some(2.0));
    }

    #[test]
    fn non_retina_external_is_1x() {
        assert_eq!(parse_display_scale(DISPLAYS_EXTERNAL), Some(1.0));
    }

    #[test]
    fn dual_display_scale_pairs_widths_within_one_block() {
        // The built-in Retina panel has no "UI Looks like" line of its own;
        // the external's UI width must not divide its backing width
        // (3024 / 1920 would report a bogus 1.575x).
        assert_eq!(parse_display_scale(DISPLAYS_DUAL), Some(2.0));
    }

    #[test]
    fn no_display_block_is_rejected() {
        assert_eq!(parse_display_scale(""), None);
        assert_eq!(parse_display_scale("Graphics/Displays:\n"), None);
    }

    #[test]
    fn rotation_supported_means_natural() {
        assert_eq!(parse_display_rotation(DISPLAYS_EXTERNAL), Rotation::Deg0);
    }

    #[test]
    fn rotation_angle_maps_to_code() {
        let rotated = DISPLAYS_EXTERNAL.replace("Rotation: Supported", "Rotation: 90");
        assert_eq!(parse_display_rotation(&rotated), Rotation::Deg90);
        let rotated = DISPLAYS_EXTERNAL.replace("Rotation: Supported", "Rotation: 270");
        assert_eq!(parse_display_rotation(&rotated), Rotation::Deg270);
    }

    #[test]
    fn rotation_absent_means_natural() {
        assert_eq!(parse_display_rotation(DISPLAYS_RETINA), Rotation::Deg0);
    }

    #[test]
    fn dual_display_rotation_reads_the_main_block() {
        // The rotated external is not the main display.
        assert_eq!(parse_display_rotation(DISPLAYS_DUAL), Rotation::Deg0);
    }

    #[test]
    fn marked_main_display_wins_over_listing_order() {
        let external_main = DISPLAYS_DUAL
            .replace("          Main Display: Yes\n", "")
            .replace(
                "Rotation: 90",
                "Rotation: 90\n          Main Display: Yes",
            );
        assert_eq!(parse_display_rotation(&external_main), Rotation::Deg90);
        assert_eq!(parse_display_scale(&external_main), Some(2.0));
    }

    #[test]
    fn model_identifier_parses() {
        assert_eq!(
            parse_model_identifier(HARDWARE).as_deref(),
            Some("MacBookPro18,3")
        );
        assert_eq!(parse_model_identifier(""), None);
    }
}
