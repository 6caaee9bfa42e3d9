//! Common validation utilities.
//!
//! Style values end up inside inline `style` attributes of rendered pages, so
//! the validators only admit the small grammar the editor produces.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Longest accepted font family name.
pub const MAX_FONT_FAMILY_LEN: usize = 64;

lazy_static! {
    static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    static ref FUNCTIONAL_COLOR_REGEX: Regex =
        Regex::new(r"^(?:rgb|rgba|hsl|hsla)\(\s*[0-9.%,/\s]+(?:deg)?[0-9.%,/\s]*\)$").unwrap();
    static ref FONT_FAMILY_REGEX: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]*$").unwrap();
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]{5,20}$").unwrap();
}

/// Returns true for hex (`#rgb`, `#rrggbb`, ...) and `rgb/rgba/hsl/hsla(...)` colors.
pub fn is_css_color(value: &str) -> bool {
    let value = value.trim();
    HEX_COLOR_REGEX.is_match(value) || FUNCTIONAL_COLOR_REGEX.is_match(value)
}

/// Validates a CSS color string.
pub fn validate_css_color(value: &str) -> Result<(), ValidationError> {
    if is_css_color(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("css_color");
        err.message = Some("Color must be a hex, rgb(a) or hsl(a) value".into());
        Err(err)
    }
}

/// Returns true when `value` is a plain font family name.
pub fn is_font_family(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_FONT_FAMILY_LEN && FONT_FAMILY_REGEX.is_match(value)
}

/// Validates a font family name.
pub fn validate_font_family(value: &str) -> Result<(), ValidationError> {
    if is_font_family(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("font_family");
        err.message = Some("Font family may only contain letters, digits, spaces and dashes".into());
        Err(err)
    }
}

/// Validates an invitation slug (`lowercase-words-123`).
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if (3..=80).contains(&value.len()) && SLUG_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("Slug must be 3-80 lowercase letters, digits and dashes".into());
        Err(err)
    }
}

/// Validates a loosely formatted phone number.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone number format is invalid".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert!(is_css_color("#fff"));
        assert!(is_css_color("#be185d"));
        assert!(is_css_color("#BE185D80"));
        assert!(!is_css_color("#ggg"));
        assert!(!is_css_color("be185d"));
        assert!(!is_css_color("#12345"));
    }

    #[test]
    fn test_functional_colors() {
        assert!(is_css_color("hsl(220, 91%, 56%)"));
        assert!(is_css_color("hsla(220, 91%, 56%, 0.5)"));
        assert!(is_css_color("rgb(255, 255, 255)"));
        assert!(is_css_color("rgba(0,0,0,0.1)"));
        assert!(is_css_color("hsl(220deg 91% 56% / 0.4)"));
    }

    #[test]
    fn test_colors_reject_injection() {
        assert!(!is_css_color("red; background: url(x)"));
        assert!(!is_css_color("rgb(0,0,0);x"));
        assert!(!is_css_color("\"><script>"));
        assert!(!is_css_color(""));
    }

    #[test]
    fn test_validate_css_color_message() {
        let err = validate_css_color("blue").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Color must be a hex, rgb(a) or hsl(a) value"
        );
    }

    #[test]
    fn test_font_family() {
        assert!(is_font_family("Playfair Display"));
        assert!(is_font_family("Open Sans"));
        assert!(is_font_family("Libre-Baskerville 2"));
        assert!(!is_font_family(""));
        assert!(!is_font_family(" Inter"));
        assert!(!is_font_family("Inter; color: red"));
        assert!(!is_font_family(&"a".repeat(MAX_FONT_FAMILY_LEN + 1)));
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("jahongir-sarvinoz-k3x9qa").is_ok());
        assert!(validate_slug("abc").is_ok());
        assert!(validate_slug("ab").is_err());
        assert!(validate_slug("Upper-Case").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+998 90 123-45-67").is_ok());
        assert!(validate_phone("(555) 0100").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12").is_err());
    }
}
