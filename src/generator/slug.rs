/// Lowercase ASCII slug: alphanumeric runs joined by single `-`.
///
/// `&` reads as `and`; every other non-alphanumeric character separates words.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.replace('&', " and ").chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Products API"), "products-api");
        assert_eq!(slugify("  Swagger Petstore - OpenAPI 3.0 "), "swagger-petstore-openapi-3-0");
        assert_eq!(slugify("Orders & Payments"), "orders-and-payments");
        assert_eq!(slugify("Café (beta)!"), "caf-beta");
        assert_eq!(slugify("---"), "");
    }
}
