//! Catalog CSV parsing.
//!
//! The source format is deliberately simple: one header line, then one
//! product per line, fields separated by commas. A double quote toggles
//! "inside a quoted field" and is itself dropped, so commas between quotes
//! stay part of the value. Escaped quotes (`""`) are not special.
//!
//! Columns are mapped by position in the order
//! `productName,brand,price,discountPrice,imageUrl,quantity,category,subCategory,absoluteUrl`.
//! Header names are not checked, only their count.

use grocer_core::NewProduct;

use super::CatalogError;

/// Number of product columns a row must provide.
pub const PRODUCT_COLUMNS: usize = 9;

/// Rows parsed from a catalog source.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub products: Vec<NewProduct>,
    /// Rows dropped because their field count did not match the header.
    pub skipped: usize,
}

/// Split one data line into trimmed fields with quotes removed.
#[must_use]
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Parse a whole catalog source.
///
/// Rows whose field count differs from the header's are skipped, not
/// rejected.
///
/// # Errors
///
/// Returns [`CatalogError::MissingHeader`] for an empty source and
/// [`CatalogError::Header`] if the header has fewer columns than a product
/// needs.
pub fn parse_rows(text: &str) -> Result<ParsedRows, CatalogError> {
    let mut lines = text.trim().split('\n');

    let header = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(CatalogError::MissingHeader)?;
    // The header is split naively; only data rows honour quotes.
    let columns = header.split(',').count();
    if columns < PRODUCT_COLUMNS {
        return Err(CatalogError::Header {
            found: columns,
            expected: PRODUCT_COLUMNS,
        });
    }

    let mut parsed = ParsedRows::default();
    for (index, line) in lines.enumerate() {
        let fields = split_line(line);
        if fields.len() != columns {
            tracing::debug!(
                line = index + 2,
                fields = fields.len(),
                expected = columns,
                "Skipping malformed catalog row"
            );
            parsed.skipped += 1;
            continue;
        }
        if let Some(product) = product_from_fields(fields) {
            parsed.products.push(product);
        }
    }

    Ok(parsed)
}

fn product_from_fields(fields: Vec<String>) -> Option<NewProduct> {
    let mut fields = fields.into_iter();
    Some(NewProduct {
        product_name: fields.next()?,
        brand: fields.next()?,
        price: fields.next()?,
        discount_price: fields.next()?,
        image_url: fields.next()?,
        quantity: fields.next()?,
        category: fields.next()?,
        sub_category: fields.next()?,
        absolute_url: fields.next()?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HEADER: &str =
        "productName,brand,price,discountPrice,imageUrl,quantity,category,subCategory,absoluteUrl";

    #[test]
    fn test_split_plain_line() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_keeps_commas_inside_quotes() {
        let fields = split_line(r#""Salt, Iodised",Tata,"20""#);
        assert_eq!(fields, vec!["Salt, Iodised", "Tata", "20"]);
    }

    #[test]
    fn test_split_trims_fields_and_trailing_cr() {
        assert_eq!(split_line(" a , b ,c\r"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_empty_fields() {
        assert_eq!(split_line(",,"), vec!["", "", ""]);
    }

    #[test]
    fn test_parse_maps_columns_by_position() {
        let text = format!(
            "{HEADER}\n\"Garlic Oil - Vegetarian Capsule 500 mg\",Sri Sri Ayurveda,220,220,https://img/1.jpg,1 pc,\"Beauty & Hygiene\",Hair Care,https://shop/1\n"
        );
        let parsed = parse_rows(&text).unwrap();

        assert_eq!(parsed.skipped, 0);
        let product = &parsed.products[0];
        assert_eq!(product.product_name, "Garlic Oil - Vegetarian Capsule 500 mg");
        assert_eq!(product.brand, "Sri Sri Ayurveda");
        assert_eq!(product.price, "220");
        assert_eq!(product.discount_price, "220");
        assert_eq!(product.image_url, "https://img/1.jpg");
        assert_eq!(product.quantity, "1 pc");
        assert_eq!(product.category, "Beauty & Hygiene");
        assert_eq!(product.sub_category, "Hair Care");
        assert_eq!(product.absolute_url, "https://shop/1");
    }

    #[test]
    fn test_parse_skips_rows_with_wrong_field_count() {
        let text = format!(
            "{HEADER}\nA,B,1,1,u,q,C,S,a\nshort,row\nD,E,2,2,u,q,C,S,a,extra\nF,G,3,3,u,q,C,S,a"
        );
        let parsed = parse_rows(&text).unwrap();

        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.products[1].product_name, "F");
    }

    #[test]
    fn test_parse_blank_line_is_skipped() {
        let text = format!("{HEADER}\nA,B,1,1,u,q,C,S,a\n\nF,G,3,3,u,q,C,S,a\n");
        let parsed = parse_rows(&text).unwrap();
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let text = format!("{HEADER}\r\nA,B,1,1,u,q,C,S,a\r\nF,G,3,3,u,q,C,S,a\r\n");
        let parsed = parse_rows(&text).unwrap();
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[0].absolute_url, "a");
    }

    #[test]
    fn test_parse_empty_source() {
        assert!(matches!(parse_rows(""), Err(CatalogError::MissingHeader)));
        assert!(matches!(parse_rows("  \n "), Err(CatalogError::MissingHeader)));
    }

    #[test]
    fn test_parse_short_header() {
        let result = parse_rows("name,brand\nA,B");
        assert!(matches!(
            result,
            Err(CatalogError::Header {
                found: 2,
                expected: 9
            })
        ));
    }

    #[test]
    fn test_header_only() {
        let parsed = parse_rows(HEADER).unwrap();
        assert!(parsed.products.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
