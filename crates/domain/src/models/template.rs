//! Template style configuration and custom template models.
//!
//! The JSON shape of [`TemplateConfig`] (camelCase keys, `type` for the
//! animation kind) matches what the web editor has always written into the
//! `custom_templates.config` column.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::invitation::InvitationDraft;

/// Category assigned to templates created in the editor.
pub const CUSTOM_CATEGORY: &str = "custom";

/// Tool identifier written to template metadata.
pub const CREATED_WITH: &str = "TemplateBuilder v3.0";

/// Inclusive bounds and step of an integer slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl MetricBounds {
    /// Clamps `value` into range and snaps it to the nearest step from `min`.
    pub fn snap(&self, value: u32) -> u32 {
        let value = value.clamp(self.min, self.max);
        let offset = value - self.min;
        let snapped = self.min + (offset + self.step / 2) / self.step * self.step;
        snapped.min(self.max)
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const SPACING_BOUNDS: MetricBounds = MetricBounds { min: 10, max: 50, step: 2 };
pub const PADDING_BOUNDS: MetricBounds = MetricBounds { min: 16, max: 60, step: 4 };
pub const BORDER_RADIUS_BOUNDS: MetricBounds = MetricBounds { min: 0, max: 30, step: 2 };
pub const SHADOW_BOUNDS: MetricBounds = MetricBounds { min: 0, max: 20, step: 1 };

/// Animation duration bounds in seconds, with a 0.1s step.
pub const MIN_ANIMATION_SECS: f64 = 0.1;
pub const MAX_ANIMATION_SECS: f64 = 2.0;

/// Clamps a duration into bounds and rounds it to one decimal place.
pub fn snap_duration(seconds: f64) -> f64 {
    if !seconds.is_finite() {
        return MIN_ANIMATION_SECS;
    }
    let clamped = seconds.clamp(MIN_ANIMATION_SECS, MAX_ANIMATION_SECS);
    (clamped * 10.0).round() / 10.0
}

/// Full style configuration of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    #[validate(nested)]
    pub colors: ColorScheme,
    #[validate(nested)]
    pub fonts: FontSet,
    #[validate(nested)]
    pub layout: LayoutSettings,
    #[validate(nested)]
    pub animations: AnimationSettings,
}

impl TemplateConfig {
    /// Baseline configuration for a built-in layout style.
    ///
    /// Invitations without a custom template render with this.
    pub fn for_style(style: LayoutStyle) -> Self {
        let mut config = Self::default();
        config.layout.style = style;
        config
    }

    /// Reads a config back from the `config` column.
    ///
    /// Older rows hold a JSON-encoded string rather than an object. Rows can
    /// be written without going through this service, so the result is
    /// validated before it is used for rendering.
    pub fn from_stored(value: serde_json::Value) -> Result<Self, StoredConfigError> {
        let config: Self = match value {
            serde_json::Value::String(raw) => serde_json::from_str(&raw)?,
            other => serde_json::from_value(other)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Tags stored alongside a template saved from the editor.
    pub fn tags(&self) -> Vec<String> {
        vec![
            self.layout.style.as_str().to_string(),
            CUSTOM_CATEGORY.to_string(),
            "real-time".to_string(),
        ]
    }
}

/// Why a stored config was rejected.
#[derive(Debug, Error)]
pub enum StoredConfigError {
    #[error("config is not readable: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config failed validation: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// The five color roles of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ColorScheme {
    #[validate(custom(function = "shared::validation::validate_css_color"))]
    pub primary: String,
    #[validate(custom(function = "shared::validation::validate_css_color"))]
    pub secondary: String,
    #[validate(custom(function = "shared::validation::validate_css_color"))]
    pub accent: String,
    #[validate(custom(function = "shared::validation::validate_css_color"))]
    pub background: String,
    #[validate(custom(function = "shared::validation::validate_css_color"))]
    pub text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "hsl(220, 91%, 56%)".to_string(),
            secondary: "hsl(220, 14%, 96%)".to_string(),
            accent: "hsl(220, 91%, 66%)".to_string(),
            background: "hsl(0, 0%, 100%)".to_string(),
            text: "hsl(224, 71%, 4%)".to_string(),
        }
    }
}

impl ColorScheme {
    pub fn get(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::Primary => &self.primary,
            ColorSlot::Secondary => &self.secondary,
            ColorSlot::Accent => &self.accent,
            ColorSlot::Background => &self.background,
            ColorSlot::Text => &self.text,
        }
    }

    pub fn set(&mut self, slot: ColorSlot, value: String) {
        match slot {
            ColorSlot::Primary => self.primary = value,
            ColorSlot::Secondary => self.secondary = value,
            ColorSlot::Accent => self.accent = value,
            ColorSlot::Background => self.background = value,
            ColorSlot::Text => self.text = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSlot {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
}

/// Heading, body and accent font families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FontSet {
    #[validate(custom(function = "shared::validation::validate_font_family"))]
    pub heading: String,
    #[validate(custom(function = "shared::validation::validate_font_family"))]
    pub body: String,
    #[validate(custom(function = "shared::validation::validate_font_family"))]
    pub accent: String,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            heading: "Playfair Display".to_string(),
            body: "Inter".to_string(),
            accent: "Dancing Script".to_string(),
        }
    }
}

impl FontSet {
    pub fn set(&mut self, slot: FontSlot, value: String) {
        match slot {
            FontSlot::Heading => self.heading = value,
            FontSlot::Body => self.body = value,
            FontSlot::Accent => self.accent = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSlot {
    Heading,
    Body,
    Accent,
}

/// Overall page composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Classic,
    Modern,
    Elegant,
    Rustic,
    Luxury,
}

impl LayoutStyle {
    pub const ALL: [LayoutStyle; 5] = [
        LayoutStyle::Classic,
        LayoutStyle::Modern,
        LayoutStyle::Elegant,
        LayoutStyle::Rustic,
        LayoutStyle::Luxury,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStyle::Classic => "classic",
            LayoutStyle::Modern => "modern",
            LayoutStyle::Elegant => "elegant",
            LayoutStyle::Rustic => "rustic",
            LayoutStyle::Luxury => "luxury",
        }
    }

    /// Parses a built-in template id such as `classic`.
    pub fn from_template_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }
}

impl std::fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMetric {
    Spacing,
    Padding,
    BorderRadius,
    ShadowIntensity,
}

impl LayoutMetric {
    pub fn bounds(&self) -> MetricBounds {
        match self {
            LayoutMetric::Spacing => SPACING_BOUNDS,
            LayoutMetric::Padding => PADDING_BOUNDS,
            LayoutMetric::BorderRadius => BORDER_RADIUS_BOUNDS,
            LayoutMetric::ShadowIntensity => SHADOW_BOUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub style: LayoutStyle,
    #[validate(range(min = 10, max = 50, message = "spacing must be between 10 and 50"))]
    pub spacing: u32,
    #[validate(range(min = 0, max = 30, message = "borderRadius must be between 0 and 30"))]
    pub border_radius: u32,
    #[validate(range(min = 0, max = 20, message = "shadowIntensity must be between 0 and 20"))]
    pub shadow_intensity: u32,
    #[validate(range(min = 16, max = 60, message = "padding must be between 16 and 60"))]
    pub padding: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            style: LayoutStyle::Elegant,
            spacing: 24,
            border_radius: 16,
            shadow_intensity: 12,
            padding: 32,
        }
    }
}

impl LayoutSettings {
    pub fn get(&self, metric: LayoutMetric) -> u32 {
        match metric {
            LayoutMetric::Spacing => self.spacing,
            LayoutMetric::Padding => self.padding,
            LayoutMetric::BorderRadius => self.border_radius,
            LayoutMetric::ShadowIntensity => self.shadow_intensity,
        }
    }

    /// Writes a slider value, clamped and snapped to the metric's step.
    pub fn set(&mut self, metric: LayoutMetric, value: u32) {
        let value = metric.bounds().snap(value);
        match metric {
            LayoutMetric::Spacing => self.spacing = value,
            LayoutMetric::Padding => self.padding = value,
            LayoutMetric::BorderRadius => self.border_radius = value,
            LayoutMetric::ShadowIntensity => self.shadow_intensity = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Fade,
    Slide,
    Scale,
    Bounce,
}

impl AnimationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Fade => "fade",
            AnimationType::Slide => "slide",
            AnimationType::Scale => "scale",
            AnimationType::Bounce => "bounce",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnimationSettings {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: AnimationType,
    #[validate(range(min = 0.1, max = 2.0, message = "duration must be between 0.1 and 2.0 seconds"))]
    pub duration: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: AnimationType::Fade,
            duration: 0.5,
        }
    }
}

// ============================================================================
// Catalogs
// ============================================================================

/// A named color scheme offered by the editor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColorPreset {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

impl ColorPreset {
    pub fn scheme(&self) -> ColorScheme {
        ColorScheme {
            primary: self.primary.to_string(),
            secondary: self.secondary.to_string(),
            accent: self.accent.to_string(),
            background: self.background.to_string(),
            text: self.text.to_string(),
        }
    }
}

pub const COLOR_PRESETS: [ColorPreset; 7] = [
    ColorPreset {
        key: "primary",
        name: "Primary",
        description: "Professional and modern",
        primary: "hsl(220, 91%, 56%)",
        secondary: "hsl(220, 14%, 96%)",
        accent: "hsl(220, 91%, 66%)",
        background: "hsl(0, 0%, 100%)",
        text: "hsl(224, 71%, 4%)",
    },
    ColorPreset {
        key: "romantic-pink",
        name: "Romantic Pink",
        description: "Delicate and romantic",
        primary: "#be185d",
        secondary: "#fda4af",
        accent: "#fb7185",
        background: "#fdf2f8",
        text: "#881337",
    },
    ColorPreset {
        key: "modern-blue",
        name: "Modern Blue",
        description: "Calm and trustworthy",
        primary: "#2563eb",
        secondary: "#60a5fa",
        accent: "#3b82f6",
        background: "#eff6ff",
        text: "#1e3a8a",
    },
    ColorPreset {
        key: "gilded-gold",
        name: "Gilded Gold",
        description: "Lavish and luxurious",
        primary: "#d97706",
        secondary: "#fbbf24",
        accent: "#f59e0b",
        background: "#fffbeb",
        text: "#92400e",
    },
    ColorPreset {
        key: "nature-green",
        name: "Nature Green",
        description: "Natural and fresh",
        primary: "#059669",
        secondary: "#34d399",
        accent: "#10b981",
        background: "#ecfdf5",
        text: "#064e3b",
    },
    ColorPreset {
        key: "luxury-purple",
        name: "Luxury Purple",
        description: "Rare and striking",
        primary: "#7c3aed",
        secondary: "#a78bfa",
        accent: "#8b5cf6",
        background: "#f5f3ff",
        text: "#581c87",
    },
    ColorPreset {
        key: "classic-black",
        name: "Classic Black",
        description: "Formal and elegant",
        primary: "#1f2937",
        secondary: "#6b7280",
        accent: "#d97706",
        background: "#ffffff",
        text: "#111827",
    },
];

/// Finds a preset by key or display name, ignoring case.
pub fn find_color_preset(name: &str) -> Option<&'static ColorPreset> {
    let name = name.trim();
    COLOR_PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FontOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const FONT_OPTIONS: [FontOption; 12] = [
    FontOption { value: "Inter", label: "Inter (Modern)" },
    FontOption { value: "Poppins", label: "Poppins (Rounded)" },
    FontOption { value: "Playfair Display", label: "Playfair Display (Classic)" },
    FontOption { value: "Dancing Script", label: "Dancing Script (Handwritten)" },
    FontOption { value: "Montserrat", label: "Montserrat (Crisp)" },
    FontOption { value: "Lora", label: "Lora (Readable)" },
    FontOption { value: "Open Sans", label: "Open Sans (Simple)" },
    FontOption { value: "Roboto", label: "Roboto (Technical)" },
    FontOption { value: "Merriweather", label: "Merriweather (Editorial)" },
    FontOption { value: "Crimson Text", label: "Crimson Text (Academic)" },
    FontOption { value: "Great Vibes", label: "Great Vibes (Graceful)" },
    FontOption { value: "Libre Baskerville", label: "Libre Baskerville (Classic)" },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayoutStyleOption {
    pub value: LayoutStyle,
    pub label: &'static str,
    pub description: &'static str,
}

pub const LAYOUT_STYLE_OPTIONS: [LayoutStyleOption; 5] = [
    LayoutStyleOption {
        value: LayoutStyle::Classic,
        label: "Classic",
        description: "Traditional and formal design",
    },
    LayoutStyleOption {
        value: LayoutStyle::Modern,
        label: "Modern",
        description: "Minimalist and simple",
    },
    LayoutStyleOption {
        value: LayoutStyle::Elegant,
        label: "Elegant",
        description: "Refined and polished",
    },
    LayoutStyleOption {
        value: LayoutStyle::Rustic,
        label: "Rustic",
        description: "Natural and warm",
    },
    LayoutStyleOption {
        value: LayoutStyle::Luxury,
        label: "Luxury",
        description: "Lavish and unique",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnimationOption {
    pub value: AnimationType,
    pub label: &'static str,
}

pub const ANIMATION_OPTIONS: [AnimationOption; 4] = [
    AnimationOption { value: AnimationType::Fade, label: "Fade" },
    AnimationOption { value: AnimationType::Slide, label: "Slide" },
    AnimationOption { value: AnimationType::Scale, label: "Scale" },
    AnimationOption { value: AnimationType::Bounce, label: "Bounce" },
];

/// Slider bounds exposed to editor clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EditorBounds {
    pub spacing: MetricBounds,
    pub padding: MetricBounds,
    pub border_radius: MetricBounds,
    pub shadow_intensity: MetricBounds,
    pub duration_min: f64,
    pub duration_max: f64,
    pub duration_step: f64,
}

impl Default for EditorBounds {
    fn default() -> Self {
        Self {
            spacing: SPACING_BOUNDS,
            padding: PADDING_BOUNDS,
            border_radius: BORDER_RADIUS_BOUNDS,
            shadow_intensity: SHADOW_BOUNDS,
            duration_min: MIN_ANIMATION_SECS,
            duration_max: MAX_ANIMATION_SECS,
            duration_step: 0.1,
        }
    }
}

/// Everything an editor client needs to build its controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateCatalog {
    pub defaults: TemplateConfig,
    pub color_presets: &'static [ColorPreset],
    pub fonts: &'static [FontOption],
    pub layout_styles: &'static [LayoutStyleOption],
    pub animation_types: &'static [AnimationOption],
    pub bounds: EditorBounds,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            defaults: TemplateConfig::default(),
            color_presets: &COLOR_PRESETS,
            fonts: &FONT_OPTIONS,
            layout_styles: &LAYOUT_STYLE_OPTIONS,
            animation_types: &ANIMATION_OPTIONS,
            bounds: EditorBounds::default(),
        }
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Stored templates
// ============================================================================

/// A custom template as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomTemplate {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_public: bool,
    pub is_featured: bool,
    pub config: TemplateConfig,
    pub custom_css: Option<String>,
    pub preview_image: Option<String>,
    pub usage_count: i32,
    pub is_active: bool,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new custom template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewCustomTemplate {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub config: TemplateConfig,
    pub is_public: bool,
    pub is_featured: bool,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
}

impl NewCustomTemplate {
    /// Builds the payload the editor saves: private, custom category, tagged
    /// with the layout style.
    pub fn from_editor(user_id: Uuid, name: &str, config: TemplateConfig, today: NaiveDate) -> Self {
        let tags = config.tags();
        Self {
            user_id,
            name: name.trim().to_string(),
            description: Some(format!("Custom template - {}", today.format("%d.%m.%Y"))),
            category: CUSTOM_CATEGORY.to_string(),
            config,
            is_public: false,
            is_featured: false,
            tags,
            metadata: serde_json::json!({
                "created_with": CREATED_WITH,
                "performance_optimized": true,
                "responsive": true,
                "real_time_preview": true,
            }),
        }
    }
}

/// Request to create a template directly (outside an editor session).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(nested)]
    pub config: TemplateConfig,

    pub is_public: Option<bool>,

    /// Invitation text shown in the preview when the template was designed.
    pub draft: Option<InvitationDraft>,
}

/// Request to update an existing template. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(nested)]
    pub config: Option<TemplateConfig>,

    pub is_public: Option<bool>,

    #[validate(length(max = 20, message = "at most 20 tags"))]
    pub tags: Option<Vec<String>>,
}

/// Paginated template listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTemplatesResponse {
    pub data: Vec<CustomTemplate>,
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TemplateConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_json_shape() {
        let json = serde_json::to_value(TemplateConfig::default()).unwrap();
        assert_eq!(json["layout"]["borderRadius"], 16);
        assert_eq!(json["layout"]["shadowIntensity"], 12);
        assert_eq!(json["layout"]["style"], "elegant");
        assert_eq!(json["animations"]["type"], "fade");
        assert_eq!(json["fonts"]["heading"], "Playfair Display");
    }

    #[test]
    fn test_config_parses_editor_json() {
        let raw = r##"{
            "colors": {"primary": "#be185d", "secondary": "#fda4af", "accent": "#fb7185",
                       "background": "#fdf2f8", "text": "#881337"},
            "fonts": {"heading": "Great Vibes", "body": "Lora", "accent": "Dancing Script"},
            "layout": {"style": "rustic", "spacing": 30, "borderRadius": 8,
                       "shadowIntensity": 4, "padding": 40},
            "animations": {"enabled": false, "type": "bounce", "duration": 1.2}
        }"##;
        let config: TemplateConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.layout.style, LayoutStyle::Rustic);
        assert_eq!(config.animations.kind, AnimationType::Bounce);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_color_fails_validation() {
        let mut config = TemplateConfig::default();
        config.colors.accent = "url(javascript:alert(1))".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_layout_fails_validation() {
        let mut config = TemplateConfig::default();
        config.layout.padding = 200;
        assert!(config.validate().is_err());

        let mut config = TemplateConfig::default();
        config.animations.duration = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metric_snap() {
        assert_eq!(SPACING_BOUNDS.snap(23), 24);
        assert_eq!(SPACING_BOUNDS.snap(0), 10);
        assert_eq!(SPACING_BOUNDS.snap(99), 50);
        assert_eq!(PADDING_BOUNDS.snap(33), 32);
        assert_eq!(PADDING_BOUNDS.snap(34), 36);
        assert_eq!(SHADOW_BOUNDS.snap(7), 7);
        assert_eq!(BORDER_RADIUS_BOUNDS.snap(31), 30);
    }

    #[test]
    fn test_snap_duration() {
        assert_eq!(snap_duration(0.0), 0.1);
        assert_eq!(snap_duration(0.54), 0.5);
        assert_eq!(snap_duration(0.56), 0.6);
        assert_eq!(snap_duration(3.0), 2.0);
        assert_eq!(snap_duration(f64::NAN), 0.1);
    }

    #[test]
    fn test_color_presets_are_valid() {
        for preset in COLOR_PRESETS.iter() {
            let scheme = preset.scheme();
            assert!(scheme.validate().is_ok(), "preset {} invalid", preset.key);
        }
    }

    #[test]
    fn test_font_options_are_valid() {
        for font in FONT_OPTIONS.iter() {
            assert!(shared::validation::is_font_family(font.value));
        }
    }

    #[test]
    fn test_find_color_preset() {
        assert_eq!(find_color_preset("romantic-pink").unwrap().primary, "#be185d");
        assert_eq!(find_color_preset("Gilded Gold").unwrap().key, "gilded-gold");
        assert_eq!(find_color_preset("  CLASSIC-BLACK ").unwrap().accent, "#d97706");
        assert!(find_color_preset("neon").is_none());
    }

    #[test]
    fn test_from_stored_rejects_markup_in_colors() {
        let mut value = serde_json::to_value(TemplateConfig::default()).unwrap();
        value["colors"]["background"] =
            serde_json::json!(r#"#fff"><a href="https://evil.example">Click</a><div x=""#);

        assert!(matches!(
            TemplateConfig::from_stored(value),
            Err(StoredConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_stored_accepts_legacy_string() {
        let mut config = TemplateConfig::default();
        config.layout.padding = 48;
        let encoded = serde_json::to_string(&config).unwrap();

        let parsed = TemplateConfig::from_stored(serde_json::Value::String(encoded)).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_first_preset_matches_defaults() {
        let primary = find_color_preset("Primary").unwrap();
        assert_eq!(primary.key, "primary");
        assert_eq!(COLOR_PRESETS[0].key, primary.key);
        assert_eq!(primary.scheme(), ColorScheme::default());
    }

    #[test]
    fn test_layout_style_from_template_id() {
        assert_eq!(LayoutStyle::from_template_id("classic"), Some(LayoutStyle::Classic));
        assert_eq!(LayoutStyle::from_template_id("luxury"), Some(LayoutStyle::Luxury));
        assert_eq!(LayoutStyle::from_template_id("Classic"), None);
    }

    #[test]
    fn test_new_template_from_editor() {
        let user_id = Uuid::new_v4();
        let mut config = TemplateConfig::default();
        config.layout.style = LayoutStyle::Luxury;
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let payload = NewCustomTemplate::from_editor(user_id, "  Gold night ", config, today);

        assert_eq!(payload.name, "Gold night");
        assert_eq!(payload.description.as_deref(), Some("Custom template - 15.06.2024"));
        assert_eq!(payload.category, "custom");
        assert!(!payload.is_public);
        assert!(!payload.is_featured);
        assert_eq!(payload.tags, vec!["luxury", "custom", "real-time"]);
        assert_eq!(payload.metadata["created_with"], CREATED_WITH);
    }

    #[test]
    fn test_catalog_contents() {
        let catalog = TemplateCatalog::new();
        assert_eq!(catalog.color_presets.len(), 7);
        assert_eq!(catalog.fonts.len(), 12);
        assert_eq!(catalog.layout_styles.len(), 5);
        assert_eq!(catalog.animation_types.len(), 4);

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["bounds"]["padding"]["step"], 4);
        assert_eq!(json["layout_styles"][3]["value"], "rustic");
    }
}
