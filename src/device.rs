use serde::{Deserialize, Serialize};

/// Viewport widths (logical pixels) used when no user agent is available
pub const MOBILE_MAX_WIDTH: f32 = 768.0;
pub const TABLET_MAX_WIDTH: f32 = 1024.0;

const MOBILE_TOKENS: &[&str] = &["iphone", "android", "blackberry", "mini", "palm"];
const TABLET_TOKENS: &[&str] = &["ipad", "tablet", "kindle", "playbook"];

/// Device class selecting one of the three keyframe tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub const ALL: [DeviceClass; 3] = [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop];

    /// Classify a browser-style user agent. Mobile tokens win over tablet tokens.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if is_mobile(&ua) {
            DeviceClass::Mobile
        } else if is_tablet(&ua) {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Classify by viewport width in logical pixels
    pub fn from_viewport_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Pick the device class for this session: user agent when given, otherwise the viewport width
    pub fn detect(user_agent: Option<&str>, viewport_width: f32) -> Self {
        match user_agent {
            Some(ua) => Self::from_user_agent(ua),
            None => Self::from_viewport_width(viewport_width),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

fn is_mobile(ua: &str) -> bool {
    MOBILE_TOKENS.iter().any(|token| ua.contains(token)) || contains_windows_ce(ua)
}

fn is_tablet(ua: &str) -> bool {
    TABLET_TOKENS.iter().any(|token| ua.contains(token))
}

/// `windows`, one whitespace character, then `ce`
fn contains_windows_ce(ua: &str) -> bool {
    ua.match_indices("windows").any(|(idx, word)| {
        let mut rest = ua[idx + word.len()..].chars();
        matches!(rest.next(), Some(c) if c.is_whitespace()) && rest.as_str().starts_with("ce")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 13_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.0 Mobile/15E148 Safari/604.1";
    const KINDLE: &str = "Mozilla/5.0 (X11; U; Linux armv7l like Android; en-us) AppleWebKit/531.2+ (KHTML, like Gecko) Version/5.0 Safari/531.2+ Kindle/3.0+";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn test_phones_are_mobile() {
        assert_eq!(DeviceClass::from_user_agent(IPHONE), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(ANDROID), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent("BlackBerry9700/5.0"), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent("Opera Mini/9.80"), DeviceClass::Mobile);
    }

    #[test]
    fn test_tablets() {
        assert_eq!(DeviceClass::from_user_agent(IPAD), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_user_agent("Mozilla/5.0 (PlayBook; U; RIM Tablet OS 2.1.0)"), DeviceClass::Tablet);
    }

    #[test]
    fn test_mobile_wins_over_tablet() {
        // Kindle UA also carries "android"
        assert_eq!(DeviceClass::from_user_agent(KINDLE), DeviceClass::Mobile);
    }

    #[test]
    fn test_desktop_default() {
        assert_eq!(DeviceClass::from_user_agent(DESKTOP), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_user_agent(""), DeviceClass::Desktop);
    }

    #[test]
    fn test_windows_ce_needs_whitespace() {
        assert_eq!(DeviceClass::from_user_agent("Mozilla/4.0 (compatible; MSIE 6.0; Windows CE)"), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent("Mozilla/4.0 (Windows\tCE)"), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent("windowsce"), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_user_agent("Windows NT"), DeviceClass::Desktop);
    }

    #[test]
    fn test_viewport_width_boundaries() {
        assert_eq!(DeviceClass::from_viewport_width(375.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_viewport_width(769.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1024.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_viewport_width(1025.0), DeviceClass::Desktop);
    }

    #[test]
    fn test_detect_prefers_user_agent() {
        assert_eq!(DeviceClass::detect(Some(IPHONE), 1920.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::detect(None, 1920.0), DeviceClass::Desktop);
        assert_eq!(DeviceClass::detect(None, 800.0), DeviceClass::Tablet);
    }
}
