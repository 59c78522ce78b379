//! お題の単語リスト（`WordSource` の実装）
//!
//! 1 行 1 単語のリストから無作為に引く。

use std::{fs, io, path::Path};

use rand::seq::SliceRandom;

use crate::domain::WordSource;

/// リストが空のときのお題
const FALLBACK_WORD: &str = "null";

const BUILTIN_WORDS: &[&str] = &[
    "anchor", "apple", "balloon", "bamboo", "bicycle", "blanket", "bridge", "butterfly",
    "candle", "castle", "chocolate", "cloud", "compass", "desert", "diamond", "dragon",
    "elephant", "feather", "firework", "forest", "garden", "ghost", "glacier", "guitar",
    "hammer", "harbor", "honey", "icecream", "island", "jungle", "kettle", "ladder",
    "lantern", "lighthouse", "magnet", "mirror", "moon", "mountain", "needle", "ocean",
    "orchestra", "painting", "parachute", "pencil", "piano", "pirate", "planet", "pyramid",
    "rainbow", "robot", "rocket", "saddle", "snowman", "spider", "sunflower", "telescope",
    "thunder", "tornado", "treasure", "umbrella", "volcano", "waterfall", "whistle", "window",
];

/// インメモリの単語リスト
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// 1 行 1 単語として読み込む。前後の空白と空行は無視する
    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|word| word.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordList {
    fn draw(&self) -> String {
        self.words
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_WORD.to_string())
    }
}
