use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

/// What a piece of terminal output is, independent of how the theme paints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
  Timestamp,
  Primary,
  Accent,
  Info,
  Success,
  Label,
  Value,
}

impl Role {
  const fn rgb(self, theme: Theme) -> (u8, u8, u8) {
    match (self, theme) {
      (Self::Timestamp | Self::Info | Self::Success, Theme::Dark) => (118, 166, 166),
      (Self::Timestamp, Theme::Light) => (92, 62, 38),
      (Self::Primary, Theme::Dark) => (191, 126, 4),
      (Self::Primary, Theme::Light) => (70, 42, 25),
      (Self::Accent, Theme::Dark) => (166, 84, 55),
      (Self::Accent, Theme::Light) => (211, 99, 70),
      (Self::Info, Theme::Light) => (40, 111, 170),
      (Self::Success, Theme::Light) => (34, 142, 90),
      (Self::Label, Theme::Dark) => (217, 164, 4),
      (Self::Label, Theme::Light) => (176, 103, 66),
      (Self::Value, Theme::Dark) => (242, 211, 56),
      (Self::Value, Theme::Light) => (199, 146, 76),
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  const fn paint(&self, role: Role) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    let (r, g, b) = role.rgb(self.theme);
    Color::Rgb { r, g, b }
  }

  pub const fn timestamp(&self) -> Color {
    self.paint(Role::Timestamp)
  }

  pub const fn primary(&self) -> Color {
    self.paint(Role::Primary)
  }

  pub const fn accent(&self) -> Color {
    self.paint(Role::Accent)
  }

  pub const fn info(&self) -> Color {
    self.paint(Role::Info)
  }

  pub const fn success(&self) -> Color {
    self.paint(Role::Success)
  }

  pub const fn label(&self) -> Color {
    self.paint(Role::Label)
  }

  pub const fn value(&self) -> Color {
    self.paint(Role::Value)
  }

  /// Help output always uses the dark palette; clap turns styling off on its own when the stream is
  /// not a terminal.
  pub const fn clap_styles() -> Styles {
    const fn style(role: Role) -> Option<ClapColor> {
      let (r, g, b) = role.rgb(Theme::Dark);
      Some(ClapColor::Rgb(RgbColor(r, g, b)))
    }

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(style(Role::Label)))
      .usage(Style::new().bold().fg_color(style(Role::Label)))
      .literal(Style::new().fg_color(style(Role::Success)))
      .placeholder(Style::new().fg_color(style(Role::Info)))
      .error(Style::new().bold().fg_color(style(Role::Accent)))
      .valid(Style::new().fg_color(style(Role::Success)))
      .invalid(Style::new().bold().fg_color(style(Role::Accent)))
  }
}

/// comfy-table has its own color type; only the colors [`Colors`] hands out need converting.
pub fn table_color(color: Color) -> ComfyColor {
  match color {
    Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
    _ => ComfyColor::Reset,
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_env(
      std::env::var("COLORFGBG").ok().as_deref(),
      std::env::var("ITERM_PROFILE").ok().as_deref(),
    ),
  }
}

/// `COLORFGBG` ends with the background palette index; 8 and above are the bright (light) colors.
fn theme_from_env(colorfgbg: Option<&str>, iterm_profile: Option<&str>) -> Theme {
  if let Some(background) = colorfgbg
    .and_then(|value| value.split(';').next_back())
    .and_then(|background| background.parse::<u8>().ok())
  {
    return if background >= 8 { Theme::Light } else { Theme::Dark };
  }

  if iterm_profile.is_some_and(|profile| profile.to_lowercase().contains("light")) {
    return Theme::Light;
  }

  Theme::Dark
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_disabled_colors_reset() {
    let colors = Colors::new(false, Theme::Dark);
    assert_eq!(colors.primary(), Color::Reset);
    assert_eq!(colors.label(), Color::Reset);
    assert_eq!(table_color(colors.value()), ComfyColor::Reset);
  }

  #[test]
  fn test_enabled_colors_follow_theme() {
    let dark = Colors::new(true, Theme::Dark);
    let light = Colors::new(true, Theme::Light);
    assert_eq!(dark.accent(), Color::Rgb { r: 166, g: 84, b: 55 });
    assert_eq!(light.accent(), Color::Rgb { r: 211, g: 99, b: 70 });
    assert_eq!(table_color(dark.value()), ComfyColor::Rgb { r: 242, g: 211, b: 56 });
  }

  #[test]
  fn test_theme_from_env() {
    assert_eq!(theme_from_env(Some("0;15"), None), Theme::Light);
    assert_eq!(theme_from_env(Some("15;0"), None), Theme::Dark);
    assert_eq!(theme_from_env(Some("garbage"), Some("Solarized Light")), Theme::Light);
    assert_eq!(theme_from_env(None, Some("Default")), Theme::Dark);
    assert_eq!(theme_from_env(None, None), Theme::Dark);
  }
}
