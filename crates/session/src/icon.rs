//! Profile icon path formatting.
//!
//! Icons are stored either as bare asset ids on the image host or as the
//! site's own default (logged-out) icon. Formatting turns both into
//! something a template can put in an `src` attribute directly: an absolute
//! image-host URL or a root-relative path.

use crate::config::IdentityConfig;

/// Relative path of the default profile icon served by the site itself.
pub const DEFAULT_ICON: &str = "imgs/profileIconLoggedOut.png";

/// Image host prefix prepended to bare icon ids.
pub const CDN_PREFIX: &str = "https://res.cloudinary.com/dxttfq7qd/image/upload/";

/// Formats profile icon references.
///
/// Rules, applied in order:
///
/// 1. Missing, empty, or the default icon (relative or root-relative) →
///    the root-relative default icon.
/// 2. Already prefixed with the image host → unchanged.
/// 3. Anything else is a bare asset id → image host prefix + id.
///
/// Formatting is idempotent, so it is safe to re-apply on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFormatter {
    cdn_prefix: String,
    default_icon: String,
}

impl Default for IconFormatter {
    fn default() -> Self {
        Self::new(CDN_PREFIX, DEFAULT_ICON)
    }
}

impl From<&IdentityConfig> for IconFormatter {
    fn from(config: &IdentityConfig) -> Self {
        Self::new(&config.cdn_prefix, &config.default_icon)
    }
}

impl IconFormatter {
    /// Create a formatter for the given image host prefix and default icon path.
    ///
    /// A leading `/` on `default_icon` is ignored.
    #[must_use]
    pub fn new(cdn_prefix: &str, default_icon: &str) -> Self {
        Self {
            cdn_prefix: cdn_prefix.to_string(),
            default_icon: default_icon.trim_start_matches('/').to_string(),
        }
    }

    /// The image host prefix.
    #[must_use]
    pub fn cdn_prefix(&self) -> &str {
        &self.cdn_prefix
    }

    /// The default icon as a root-relative path.
    #[must_use]
    pub fn default_icon_url(&self) -> String {
        format!("/{}", self.default_icon)
    }

    /// Format an icon reference.
    #[must_use]
    pub fn format(&self, path: Option<&str>) -> String {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return self.default_icon_url();
        };

        if self.is_default(path) {
            self.default_icon_url()
        } else if path.starts_with(&self.cdn_prefix) {
            path.to_string()
        } else {
            format!("{}{path}", self.cdn_prefix)
        }
    }

    /// Whether `path` refers to the default icon, with or without a leading `/`.
    #[must_use]
    pub fn is_default(&self, path: &str) -> bool {
        path.strip_prefix('/').unwrap_or(path) == self.default_icon
    }
}

/// Format an icon reference with the built-in image host and default icon.
///
/// See [`IconFormatter`] for the rules.
#[must_use]
pub fn format_icon(path: Option<&str>) -> String {
    IconFormatter::default().format(path)
}
