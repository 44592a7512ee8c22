use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::chart::ChartLayout;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartSettings {
    pub layout: ChartLayout,
    /// Teammate viewing the chart; marks-for-close from this member set `is_marked`.
    pub member_id: Option<String>,
    pub week_start: Weekday,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            member_id: None,
            week_start: Weekday::Mon,
        }
    }
}

impl ChartSettings {
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let margins = [
            layout.zero_margin,
            layout.control_line_margin,
            layout.left_margin,
            layout.right_margin,
            layout.marker_radius,
            layout.hit_radius,
        ];
        if margins.iter().any(|m| !m.is_finite() || *m < 0.0) {
            bail!("Invalid layout. Margins and radii must be finite and non-negative");
        }
        if !(layout.width > 0.0 && layout.height > 0.0) {
            bail!("Invalid layout. Width and height must be positive");
        }
        if layout.hit_radius < layout.marker_radius {
            bail!("Invalid layout. Hit radius must cover the marker radius");
        }
        Ok(())
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ChartSettings>,
}

impl SettingsStore {
    /// Missing, unreadable-as-JSON or invalid settings fall back to defaults;
    /// only an I/O failure on an existing file is an error.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            decode_or_default(&contents, &path)
        } else {
            ChartSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ChartSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: ChartSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    pub fn update_layout(&self, layout: ChartLayout) -> Result<()> {
        let mut next = self.settings();
        next.layout = layout;
        self.update(next)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: ChartSettings = serde_json::from_str(&contents)?;
        data.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &ChartSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

fn decode_or_default(contents: &str, path: &std::path::Path) -> ChartSettings {
    let decoded = serde_json::from_str::<ChartSettings>(contents)
        .map_err(anyhow::Error::from)
        .and_then(|settings| settings.validate().map(|_| settings));

    match decoded {
        Ok(settings) => settings,
        Err(err) => {
            log_warn!("ignoring settings at {}: {err:#}", path.display());
            ChartSettings::default()
        }
    }
}
