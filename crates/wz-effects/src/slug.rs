/// Turn a display name into a roll-option slug.
///
/// Lowercases the name and joins alphanumeric runs with single hyphens:
/// `"Bless (Aura)"` becomes `"bless-aura"`.
pub fn sluggify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
