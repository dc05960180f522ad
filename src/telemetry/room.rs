//! Default room naming: `"{host}-{program}"`, with every run of characters
//! outside `[0-9A-Za-z]` collapsed to a single `-`.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z]+").expect("literal pattern"));

/// Collapses non-alphanumeric runs to `-`.
pub fn sanitize_room(raw: &str) -> String {
    NON_ALNUM.replace_all(raw, "-").into_owned()
}

/// Room derived from the host name and the invoking program.
pub fn default_room_name() -> String {
    let program = std::env::args().next().unwrap_or_default();
    sanitize_room(&format!("{}-{program}", host_name()))
}

/// System host name; the `HOSTNAME`/`COMPUTERNAME` variables only when it is unreadable.
fn host_name() -> String {
    let system = gethostname::gethostname().to_string_lossy().trim().to_string();
    if !system.is_empty() {
        return system;
    }
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}
