use std::env;
use std::str::FromStr;
use std::time::Duration;

use foundation::geo::LatLng;
use layers::HeatmapStyle;
use provider::ViewportOptions;

use crate::error::ConfigError;

/// Highest zoom level accepted for any configured zoom.
pub const MAX_ZOOM: u8 = 22;

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Time after the last gesture before autonomous control resumes.
    pub quiet_period: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutopilotConfig {
    pub tick_period: Duration,
    /// Delay between the pan and the zoom-in, and between the zoom-out and the advance.
    pub settle_delay: Duration,
    pub focus_zoom: u8,
    pub overview_zoom: u8,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(3),
            settle_delay: Duration::from_secs(1),
            focus_zoom: 16,
            overview_zoom: 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub credential: Option<String>,
    pub theme: Option<String>,
    pub initial_center: LatLng,
    pub initial_zoom: u8,
    pub locate_zoom: u8,
    pub interaction: InteractionConfig,
    pub autopilot: AutopilotConfig,
    pub heatmap: HeatmapStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            credential: None,
            theme: None,
            // Santo Domingo.
            initial_center: LatLng::new(18.4861, -69.9312),
            initial_zoom: 11,
            locate_zoom: 15,
            interaction: InteractionConfig::default(),
            autopilot: AutopilotConfig::default(),
            heatmap: HeatmapStyle::default(),
        }
    }
}

impl MapConfig {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }

    /// Reads `MAP_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`MapConfig::from_env`] with an injectable variable source.
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            credential: non_empty("MAP_API_KEY"),
            theme: non_empty("MAP_THEME_ID"),
            interaction: InteractionConfig {
                quiet_period: env_millis(
                    &lookup,
                    "MAP_QUIET_PERIOD_MS",
                    d.interaction.quiet_period,
                )?,
            },
            autopilot: AutopilotConfig {
                tick_period: env_millis(&lookup, "MAP_AUTOPILOT_TICK_MS", d.autopilot.tick_period)?,
                settle_delay: env_millis(
                    &lookup,
                    "MAP_AUTOPILOT_SETTLE_MS",
                    d.autopilot.settle_delay,
                )?,
                focus_zoom: env_parse(&lookup, "MAP_FOCUS_ZOOM", d.autopilot.focus_zoom)?,
                overview_zoom: env_parse(&lookup, "MAP_OVERVIEW_ZOOM", d.autopilot.overview_zoom)?,
            },
            ..d
        })
    }

    /// Checks everything mount needs and returns the credential.
    pub fn validate(&self) -> Result<&str, ConfigError> {
        let credential = self
            .credential
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let ap = &self.autopilot;
        if self.interaction.quiet_period.is_zero() {
            return Err(ConfigError::ZeroPeriod {
                name: "quiet period",
            });
        }
        if ap.tick_period.is_zero() {
            return Err(ConfigError::ZeroPeriod {
                name: "autopilot tick period",
            });
        }
        if ap.settle_delay >= ap.tick_period {
            return Err(ConfigError::SettleNotShorterThanTick {
                settle_ms: millis(ap.settle_delay),
                tick_ms: millis(ap.tick_period),
            });
        }
        for zoom in [
            self.initial_zoom,
            self.locate_zoom,
            ap.focus_zoom,
            ap.overview_zoom,
        ] {
            if zoom > MAX_ZOOM {
                return Err(ConfigError::ZoomOutOfRange {
                    zoom,
                    max: MAX_ZOOM,
                });
            }
        }
        if ap.focus_zoom <= ap.overview_zoom {
            return Err(ConfigError::ZoomOrder {
                focus: ap.focus_zoom,
                overview: ap.overview_zoom,
            });
        }
        Ok(credential)
    }

    pub fn viewport_options(&self, credential: &str) -> ViewportOptions {
        let mut options = ViewportOptions::new(self.initial_center, self.initial_zoom, credential);
        options.theme = self.theme.clone();
        options
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn env_parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value: v }),
    }
}

fn env_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    env_parse(lookup, key, millis(default)).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_dashboard_timings() {
        let c = MapConfig::default();
        assert_eq!(c.interaction.quiet_period, Duration::from_secs(5));
        assert_eq!(c.autopilot.tick_period, Duration::from_secs(3));
        assert_eq!(c.autopilot.settle_delay, Duration::from_secs(1));
        assert_eq!((c.autopilot.focus_zoom, c.autopilot.overview_zoom), (16, 11));
        assert_eq!(c.heatmap, HeatmapStyle::new(50, 0.6));
    }

    #[test]
    fn reads_overrides_from_lookup() {
        let c = MapConfig::from_lookup(lookup(&[
            ("MAP_API_KEY", "abc"),
            ("MAP_THEME_ID", "dark"),
            ("MAP_AUTOPILOT_TICK_MS", "4000"),
            ("MAP_FOCUS_ZOOM", " 17 "),
        ]))
        .unwrap();
        assert_eq!(c.credential.as_deref(), Some("abc"));
        assert_eq!(c.theme.as_deref(), Some("dark"));
        assert_eq!(c.autopilot.tick_period, Duration::from_millis(4000));
        assert_eq!(c.autopilot.focus_zoom, 17);
        assert_eq!(c.autopilot.settle_delay, Duration::from_secs(1));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let c = MapConfig::from_lookup(lookup(&[("MAP_API_KEY", "   ")])).unwrap();
        assert_eq!(c.credential, None);
        assert_eq!(c.validate(), Err(ConfigError::MissingCredential));
    }

    #[test]
    fn unparsable_env_is_an_error() {
        let err = MapConfig::from_lookup(lookup(&[("MAP_QUIET_PERIOD_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: "MAP_QUIET_PERIOD_MS",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn validate_rejects_inconsistent_timings_and_zooms() {
        let mut c = MapConfig::with_credential("k");
        assert_eq!(c.validate(), Ok("k"));

        c.autopilot.settle_delay = Duration::from_secs(3);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::SettleNotShorterThanTick { .. })
        ));

        let mut c = MapConfig::with_credential("k");
        c.autopilot.focus_zoom = 10;
        assert_eq!(
            c.validate(),
            Err(ConfigError::ZoomOrder {
                focus: 10,
                overview: 11
            })
        );

        let mut c = MapConfig::with_credential("k");
        c.interaction.quiet_period = Duration::ZERO;
        assert!(matches!(c.validate(), Err(ConfigError::ZeroPeriod { .. })));

        let mut c = MapConfig::with_credential("k");
        c.locate_zoom = 30;
        assert!(matches!(c.validate(), Err(ConfigError::ZoomOutOfRange { zoom: 30, .. })));
    }

    #[test]
    fn viewport_options_carry_theme() {
        let mut c = MapConfig::with_credential("k");
        c.theme = Some("night".into());
        let o = c.viewport_options("k");
        assert_eq!(o.theme.as_deref(), Some("night"));
        assert_eq!(o.zoom, 11);
        assert!(o.hide_points_of_interest);
        assert!(!o.street_view_control);
    }
}
