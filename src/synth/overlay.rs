//! Version Overlay
//!
//! Rewrites the version numbers inside a user agent with sampled OS-version
//! and browser-version labels. A token is only rewritten when it is already
//! present, so overlaying never changes which browser or OS a user agent
//! claims to be.

use crate::fingerprint::os::OsCategory;

/// Version tokens a browser family carries in its user agent
pub fn browser_version_tokens(browser_key: &str) -> &'static [&'static str] {
    match browser_key {
        "chrome" => &["Chrome/"],
        "firefox" => &["Firefox/", "rv:"],
        "safari" | "mobile safari" => &["Version/"],
        "edge" => &["Edg/"],
        "google app" => &["GSA/"],
        "samsung internet" => &["SamsungBrowser/"],
        "opera" => &["OPR/"],
        _ => &[],
    }
}

/// The numeric part of a version label (`Chrome 124.0` -> `124.0`)
pub fn version_number(label: &str) -> Option<&str> {
    label
        .split_whitespace()
        .rev()
        .find(|part| part.starts_with(|c: char| c.is_ascii_digit()))
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '_'
}

/// Replace the version that follows `prefix`. Returns `None` when the prefix
/// is absent or not followed by a version.
fn replace_after(user_agent: &str, prefix: &str, version: &str) -> Option<String> {
    let start = user_agent.find(prefix)? + prefix.len();
    let rest = &user_agent[start..];
    let len = rest
        .char_indices()
        .find(|(_, c)| !is_version_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if len == 0 {
        return None;
    }
    Some(format!("{}{}{}", &user_agent[..start], version, &rest[len..]))
}

/// Apply a browser version label to every token of the family
pub fn apply_browser_version(user_agent: &str, browser_key: &str, label: &str) -> Option<String> {
    let version = version_number(label)?;
    let mut current = user_agent.to_string();
    let mut changed = false;
    for token in browser_version_tokens(browser_key) {
        if let Some(next) = replace_after(&current, token, version) {
            current = next;
            changed = true;
        }
    }
    changed.then_some(current)
}

/// Apply an OS version label in the OS's own notation
pub fn apply_os_version(user_agent: &str, os: OsCategory, label: &str) -> Option<String> {
    let version = version_number(label)?;
    match os {
        OsCategory::Windows => {
            // Windows 11 still reports NT 10.0
            let nt = if version.contains('.') { version } else { "10.0" };
            replace_after(user_agent, "Windows NT ", nt)
        }
        OsCategory::MacOs => {
            let start = user_agent.find("Mac OS X ")? + "Mac OS X ".len();
            let underscored = user_agent[start..].starts_with(|c: char| c.is_ascii_digit())
                && user_agent[start..]
                    .chars()
                    .take_while(|c| is_version_char(*c))
                    .any(|c| c == '_');
            let formatted = if underscored {
                version.replace('.', "_")
            } else {
                version.replace('_', ".")
            };
            replace_after(user_agent, "Mac OS X ", &formatted)
        }
        OsCategory::Android => replace_after(user_agent, "Android ", version),
        OsCategory::Ios => {
            let formatted = version.replace('.', "_");
            replace_after(user_agent, "CPU iPhone OS ", &formatted)
                .or_else(|| replace_after(user_agent, "CPU OS ", &formatted))
        }
        OsCategory::Linux | OsCategory::Others => None,
    }
}
