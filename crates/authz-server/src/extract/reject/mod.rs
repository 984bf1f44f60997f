//! Axum extractors whose rejections render as [`ErrorResponse`] bodies.
//!
//! [`ErrorResponse`]: crate::handler::response::ErrorResponse

/// Forwards the OpenAPI input description of a wrapper to the axum
/// extractor it wraps.
macro_rules! forward_operation_input {
    ($wrapper:ident => $inner:ident) => {
        impl<T> aide::OperationInput for $wrapper<T>
        where
            T: schemars::JsonSchema,
        {
            fn operation_input(
                ctx: &mut aide::generate::GenContext,
                operation: &mut aide::openapi::Operation,
            ) {
                <$inner<T> as aide::OperationInput>::operation_input(ctx, operation);
            }

            fn inferred_early_responses(
                ctx: &mut aide::generate::GenContext,
                operation: &mut aide::openapi::Operation,
            ) -> Vec<(Option<u16>, aide::openapi::Response)> {
                <$inner<T> as aide::OperationInput>::inferred_early_responses(ctx, operation)
            }
        }
    };
}

mod enhanced_json;
mod enhanced_multipart;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_multipart::Multipart;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// Shortens a parser message to its first `lines` lines and `chars`
/// characters.
fn clip(message: &str, lines: usize, chars: usize) -> String {
    let mut clipped = message.lines().take(lines).collect::<Vec<_>>().join(" ");
    if let Some((cut, _)) = clipped.char_indices().nth(chars) {
        clipped.truncate(cut);
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_joins_lines_and_truncates() {
        let message = "first line\nsecond line\nthird line";
        assert_eq!(clip(message, 2, 200), "first line second line");
        assert_eq!(clip(message, 3, 5), "first");
        assert_eq!(clip("õõõ", 1, 2), "õõ");
    }
}
