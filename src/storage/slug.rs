use sha2::{Digest, Sha256};

/// Slugs longer than this are cut so they always fit a file name
pub const MAX_SLUG_BYTES: usize = 200;

/// Collapses every run of non-alphanumeric characters into one underscore
///
/// Case is preserved. Underscores count as separators, so the output never
/// contains two adjacent underscores.
///
/// ```
/// use linkmind::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "Hello_World_");
/// assert_eq!(slugify("news.example.com"), "news_example_com");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut in_separator = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            in_separator = false;
        } else if !in_separator {
            slug.push('_');
            in_separator = true;
        }
    }

    slug
}

/// Slug used as the file name and dedup input for an article title
pub fn title_slug(title: &str) -> String {
    let mut slug = slugify(&title.to_lowercase());
    if slug.len() > MAX_SLUG_BYTES {
        let mut end = MAX_SLUG_BYTES;
        while !slug.is_char_boundary(end) {
            end -= 1;
        }
        slug.truncate(end);
    }
    slug
}

/// Dedup index key of a slug (hex SHA-256)
pub fn dedup_key(slug: &str) -> String {
    hex::encode(Sha256::digest(slug.as_bytes()))
}
