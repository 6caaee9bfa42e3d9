//! Live preview rendering.
//!
//! Everything here is a pure function of the style configuration, the
//! invitation text and the preview device. User text and every style value
//! are HTML-escaped where they are interpolated into markup.

use serde::{Deserialize, Serialize};

use crate::models::invitation::InvitationDraft;
use crate::models::template::{AnimationType, LayoutStyle, TemplateConfig};

/// Viewport the preview is rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewDevice {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// Utility classes for text at each size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSizes {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub body: &'static str,
    pub small: &'static str,
}

impl PreviewDevice {
    /// Width and scale classes of the preview frame.
    pub fn container_class(&self) -> &'static str {
        match self {
            PreviewDevice::Mobile => "max-w-xs scale-75 md:scale-90",
            PreviewDevice::Tablet => "max-w-sm scale-85 md:scale-95",
            PreviewDevice::Desktop => "max-w-md lg:max-w-lg",
        }
    }

    pub fn text_sizes(&self) -> TextSizes {
        match self {
            PreviewDevice::Mobile => TextSizes {
                title: "text-lg",
                subtitle: "text-base",
                body: "text-sm",
                small: "text-xs",
            },
            PreviewDevice::Tablet => TextSizes {
                title: "text-xl md:text-2xl",
                subtitle: "text-lg",
                body: "text-base",
                small: "text-sm",
            },
            PreviewDevice::Desktop => TextSizes {
                title: "text-2xl md:text-3xl xl:text-4xl",
                subtitle: "text-lg xl:text-xl",
                body: "text-base xl:text-lg",
                small: "text-sm",
            },
        }
    }
}

/// Ordered CSS declarations for an inline `style` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineStyle(Vec<(&'static str, String)>);

impl InlineStyle {
    fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.0.push((property, value.into()));
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The declarations escaped for a double-quoted attribute.
    pub fn to_attr(&self) -> String {
        escape_html(&self.to_css())
    }
}

fn font_stack(family: &str, fallback: &str) -> String {
    format!("'{}', {}", family, fallback)
}

fn transition(config: &TemplateConfig) -> String {
    if config.animations.enabled {
        format!("all {}s ease-in-out", config.animations.duration)
    } else {
        "none".to_string()
    }
}

/// Border color at low opacity. Only six-digit hex colors take an alpha suffix.
fn faded_border(accent: &str) -> String {
    let is_hex6 = accent.len() == 7
        && accent.starts_with('#')
        && accent[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex6 {
        format!("2px solid {}20", accent)
    } else {
        format!("2px solid {}", accent)
    }
}

/// Style of the outer invitation card.
pub fn container_style(config: &TemplateConfig) -> InlineStyle {
    let shadow = config.layout.shadow_intensity;
    let scaled = config.animations.enabled && config.animations.kind == AnimationType::Scale;

    InlineStyle::default()
        .with("background-color", config.colors.background.clone())
        .with("color", config.colors.text.clone())
        .with("font-family", font_stack(&config.fonts.body, "sans-serif"))
        .with("padding", format!("{}px", config.layout.padding))
        .with("border-radius", format!("{}px", config.layout.border_radius))
        .with("box-shadow", format!("0 {}px {}px rgba(0,0,0,0.1)", shadow, shadow * 2))
        .with("border", faded_border(&config.colors.accent))
        .with("transition", transition(config))
        .with("transform", if scaled { "scale(1.02)" } else { "scale(1)" })
}

/// Style of the couple's names.
pub fn heading_style(config: &TemplateConfig) -> InlineStyle {
    InlineStyle::default()
        .with("font-family", font_stack(&config.fonts.heading, "serif"))
        .with("color", config.colors.primary.clone())
        .with("transition", transition(config))
}

/// Style of decorative accent lines.
pub fn accent_style(config: &TemplateConfig) -> InlineStyle {
    InlineStyle::default()
        .with("font-family", font_stack(&config.fonts.accent, "cursive"))
        .with("color", config.colors.accent.clone())
        .with("transition", transition(config))
}

fn text_color(color: &str) -> InlineStyle {
    InlineStyle::default().with("color", color)
}

fn section_style(config: &TemplateConfig) -> InlineStyle {
    InlineStyle::default().with("margin-top", format!("{}px", config.layout.spacing))
}

pub fn layout_class(style: LayoutStyle) -> &'static str {
    match style {
        LayoutStyle::Classic => "text-center space-y-6",
        LayoutStyle::Modern => "text-center space-y-4",
        LayoutStyle::Elegant => "text-center space-y-8",
        LayoutStyle::Rustic => "text-left space-y-6",
        LayoutStyle::Luxury => "text-center space-y-10",
    }
}

fn animation_class(config: &TemplateConfig) -> Option<String> {
    config
        .animations
        .enabled
        .then(|| format!("animate-{}", config.animations.kind.as_str()))
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Renders the invitation card as a self-contained HTML fragment.
pub fn render_invitation_html(
    config: &TemplateConfig,
    content: &InvitationDraft,
    device: PreviewDevice,
) -> String {
    let sizes = device.text_sizes();
    let colors = &config.colors;
    let mut card_class = String::from("invitation-card");
    if let Some(animation) = animation_class(config) {
        card_class.push(' ');
        card_class.push_str(&animation);
    }

    let mut html = String::new();
    html.push_str(&format!(
        r#"<div class="w-full {} mx-auto transition-all duration-500">"#,
        device.container_class()
    ));
    html.push_str(&format!(
        r#"<div class="{}" style="{}"><div class="{}">"#,
        card_class,
        container_style(config).to_attr(),
        layout_class(config.layout.style)
    ));
    html.push_str(&format!(
        r#"<div class="{} font-medium tracking-widest uppercase opacity-75" style="{}">Wedding Invitation</div>"#,
        sizes.small,
        text_color(&colors.secondary).to_attr()
    ));

    let heading = heading_style(config).to_attr();
    html.push_str(&format!(
        r#"<div class="names"><h1 class="{title} font-bold tracking-wide" style="{heading}">{}</h1><div class="{} font-bold" style="{}">&amp;</div><h1 class="{title} font-bold tracking-wide" style="{heading}">{}</h1></div>"#,
        escape_html(&content.groom_name),
        sizes.subtitle,
        accent_style(config).to_attr(),
        escape_html(&content.bride_name),
        title = sizes.title,
        heading = heading,
    ));

    let when = [
        (content.wedding_date.as_str(), sizes.subtitle, &colors.primary),
        (content.wedding_time.as_str(), sizes.body, &colors.secondary),
    ];
    let place = [
        (content.venue.as_str(), sizes.subtitle, &colors.primary),
        (content.address.as_str(), sizes.body, &colors.secondary),
    ];
    for (class, lines) in [("event-date", when), ("event-venue", place)] {
        let lines: Vec<_> = lines
            .into_iter()
            .filter_map(|(text, size, color)| non_empty(text).map(|t| (t, size, color)))
            .collect();
        if lines.is_empty() {
            continue;
        }
        html.push_str(&format!(
            r#"<div class="event-details {}" style="{}">"#,
            class,
            section_style(config).to_attr()
        ));
        for (text, size, color) in lines {
            html.push_str(&format!(
                r#"<p class="{}" style="{}">{}</p>"#,
                size,
                text_color(color).to_attr(),
                escape_html(text)
            ));
        }
        html.push_str("</div>");
    }

    if let Some(message) = non_empty(&content.custom_message) {
        html.push_str(&format!(
            r#"<p class="custom-message {} leading-relaxed italic" style="{}">&quot;{}&quot;</p>"#,
            sizes.body,
            text_color(&colors.text).to_attr(),
            escape_html(message)
        ));
    }

    html.push_str("</div></div></div>");
    html
}

/// Google Fonts query for the distinct families of the config.
fn font_query(config: &TemplateConfig) -> String {
    let mut families: Vec<&str> = Vec::with_capacity(3);
    for family in [&config.fonts.heading, &config.fonts.body, &config.fonts.accent] {
        if !families.contains(&family.as_str()) {
            families.push(family);
        }
    }
    families
        .iter()
        .map(|f| format!("family={}", escape_html(&f.replace(' ', "+"))))
        .collect::<Vec<_>>()
        .join("&amp;")
}

/// Wraps the invitation card in a full HTML document.
pub fn render_page(
    title: &str,
    config: &TemplateConfig,
    content: &InvitationDraft,
    device: PreviewDevice,
) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css2?{fonts}&amp;display=swap\">\n",
            "</head>\n<body style=\"margin: 0; background-color: {bg}\">\n",
            "<main style=\"display: flex; justify-content: center; padding: 24px\">{card}</main>\n",
            "</body>\n</html>\n"
        ),
        title = escape_html(title),
        fonts = font_query(config),
        bg = escape_html(&config.colors.secondary),
        card = render_invitation_html(config, content, device),
    )
}
