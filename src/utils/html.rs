use ammonia;

/// Whitelist-sanitizes stored free text (certification descriptions,
/// question bodies) before it is persisted and later re-served.
/// Safe inline markup survives; scripts, iframes and event-handler
/// attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
