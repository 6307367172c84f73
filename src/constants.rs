pub(crate) const HEADER_CSP: &str = "Content-Security-Policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "Content-Security-Policy-Report-Only";
pub(crate) const HEADER_X_FRAME_OPTIONS: &str = "X-Frame-Options";
pub(crate) const HEADER_HSTS: &str = "Strict-Transport-Security";
pub(crate) const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
pub(crate) const HEADER_X_DOWNLOAD_OPTIONS: &str = "X-Download-Options";
pub(crate) const HEADER_X_XSS_PROTECTION: &str = "X-XSS-Protection";
pub(crate) const HEADER_X_ROBOTS_TAG: &str = "X-Robots-Tag";
pub(crate) const HEADER_REFERRER_POLICY: &str = "Referrer-Policy";
pub(crate) const HEADER_HPKP: &str = "Public-Key-Pins";
pub(crate) const HEADER_HPKP_REPORT_ONLY: &str = "Public-Key-Pins-Report-Only";
pub(crate) const HEADER_UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";

pub(crate) const DEFAULT_SRC: &str = "default-src";
pub(crate) const SCRIPT_SRC: &str = "script-src";
pub(crate) const OBJECT_SRC: &str = "object-src";
pub(crate) const STYLE_SRC: &str = "style-src";
pub(crate) const IMG_SRC: &str = "img-src";
pub(crate) const MEDIA_SRC: &str = "media-src";
pub(crate) const FRAME_SRC: &str = "frame-src";
pub(crate) const FONT_SRC: &str = "font-src";
pub(crate) const CONNECT_SRC: &str = "connect-src";
pub(crate) const BASE_URI: &str = "base-uri";
pub(crate) const CHILD_SRC: &str = "child-src";
pub(crate) const FORM_ACTION: &str = "form-action";
pub(crate) const FRAME_ANCESTORS: &str = "frame-ancestors";
pub(crate) const MANIFEST_SRC: &str = "manifest-src";
pub(crate) const WORKER_SRC: &str = "worker-src";

pub(crate) const SANDBOX: &str = "sandbox";
pub(crate) const PLUGIN_TYPES: &str = "plugin-types";
pub(crate) const UPGRADE_INSECURE_REQUESTS: &str = "upgrade-insecure-requests";
pub(crate) const BLOCK_ALL_MIXED_CONTENT: &str = "block-all-mixed-content";
pub(crate) const REPORT_URI: &str = "report-uri";

pub(crate) const NONE_SOURCE: &str = "'none'";
pub(crate) const SELF_SOURCE: &str = "'self'";
pub(crate) const UNSAFE_INLINE_SOURCE: &str = "'unsafe-inline'";
pub(crate) const UNSAFE_EVAL_SOURCE: &str = "'unsafe-eval'";
pub(crate) const STRICT_DYNAMIC_SOURCE: &str = "'strict-dynamic'";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const HASH_PREFIX_SHA256: &str = "sha256-";
pub(crate) const HASH_PREFIX_SHA384: &str = "sha384-";
pub(crate) const HASH_PREFIX_SHA512: &str = "sha512-";
pub(crate) const SUFFIX_QUOTE: &str = "'";

pub(crate) const SANDBOX_ALLOW_FORMS: &str = "allow-forms";
pub(crate) const SANDBOX_ALLOW_MODALS: &str = "allow-modals";
pub(crate) const SANDBOX_ALLOW_ORIENTATION_LOCK: &str = "allow-orientation-lock";
pub(crate) const SANDBOX_ALLOW_POINTER_LOCK: &str = "allow-pointer-lock";
pub(crate) const SANDBOX_ALLOW_POPUPS: &str = "allow-popups";
pub(crate) const SANDBOX_ALLOW_POPUPS_TO_ESCAPE_SANDBOX: &str = "allow-popups-to-escape-sandbox";
pub(crate) const SANDBOX_ALLOW_PRESENTATION: &str = "allow-presentation";
pub(crate) const SANDBOX_ALLOW_SAME_ORIGIN: &str = "allow-same-origin";
pub(crate) const SANDBOX_ALLOW_SCRIPTS: &str = "allow-scripts";
pub(crate) const SANDBOX_ALLOW_TOP_NAVIGATION: &str = "allow-top-navigation";

pub(crate) const DIRECTIVE_SEPARATOR: char = ';';
pub(crate) const DEFAULT_NONCE_LENGTH: usize = 18;
pub(crate) const NONCE_BUFFER_POOL_SIZE: usize = 32;
pub(crate) const DEFAULT_HEADER_CAPACITY: usize = 256;
pub(crate) const DEFAULT_HTTPS_PORT: u16 = 443;
pub(crate) const DEFAULT_MAX_REPORT_SIZE: usize = 16 * 1024;
pub(crate) const DEFAULT_REPORT_PATH: &str = "/csp-report";
pub(crate) const HSTS_PRELOAD_MIN_MAX_AGE: u64 = 10_886_400;
pub(crate) const HPKP_MIN_PINS: usize = 2;
