//! Board image URLs.

use uuid::Uuid;

pub const DEFAULT_RENDER_BASE_URL: &str = "https://lila-gif.fly.dev/image.gif";

/// Annotations for a rendered board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render from black's side of the board.
    pub flip_board: bool,
    /// Last move as concatenated squares, e.g. `e2e4`.
    pub last_move: Option<String>,
    /// Square of a king in check, highlighted in red.
    pub check: Option<String>,
}

pub trait BoardRenderer: Send + Sync {
    fn render_url(&self, fen: &str, options: &RenderOptions) -> String;
}

/// Renderer for a lila-gif style image service.
#[derive(Debug, Clone)]
pub struct LilaGifRenderer {
    base_url: String,
}

impl LilaGifRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Query string without the cache-busting fragment.
    pub fn query(fen: &str, options: &RenderOptions) -> String {
        let placement = fen.split_whitespace().next().unwrap_or("");

        let mut params = vec![format!("fen={placement}")];
        if options.flip_board {
            params.push("orientation=black".to_string());
        }
        if let Some(last_move) = &options.last_move {
            params.push(format!("lastMove={last_move}"));
        }
        if let Some(check) = &options.check {
            params.push(format!("check={check}"));
        }
        params.join("&")
    }
}

impl Default for LilaGifRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_BASE_URL)
    }
}

impl BoardRenderer for LilaGifRenderer {
    fn render_url(&self, fen: &str, options: &RenderOptions) -> String {
        // Unique fragment per render; chat clients cache images by URL.
        format!(
            "{}?{}#{}",
            self.base_url,
            Self::query(fen, options),
            Uuid::new_v4().simple()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::STARTING_FEN;

    #[test]
    fn test_plain_board_query() {
        let query = LilaGifRenderer::query(STARTING_FEN, &RenderOptions::default());
        assert_eq!(query, "fen=rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    }

    #[test]
    fn test_annotated_query_order() {
        let options = RenderOptions {
            flip_board: true,
            last_move: Some("d8h4".into()),
            check: Some("e1".into()),
        };
        let query = LilaGifRenderer::query(STARTING_FEN, &options);
        assert!(query.ends_with("&orientation=black&lastMove=d8h4&check=e1"));
    }

    #[test]
    fn test_urls_are_unique() {
        let renderer = LilaGifRenderer::default();
        let a = renderer.render_url(STARTING_FEN, &RenderOptions::default());
        let b = renderer.render_url(STARTING_FEN, &RenderOptions::default());
        assert!(a.starts_with("https://lila-gif.fly.dev/image.gif?fen="));
        assert_ne!(a, b);
    }
}
