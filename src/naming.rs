//! Filename and heading naming rules shared by every builder.
//!
//! Three conventions live here so the single-page builder, the module-index
//! builder and the Markdown renderer agree on them:
//!
//! - **Fallback titles**: a lesson without any heading is titled after its
//!   file stem, separators turned into spaces (`01-tipos-de-dados.md` →
//!   "01 tipos de dados").
//! - **Slugs**: lowercase ASCII tokens joined by single hyphens. Latin
//!   diacritics are folded first, so `"Minha Seção 1!"` → `minha-secao-1`.
//! - **Anchors**: slugs made unique within one page by [`AnchorRegistry`].

use std::collections::HashMap;

/// Token used when a title has no ASCII-alphanumeric content at all.
pub const DEFAULT_ANCHOR: &str = "sec";

/// Build a display title from a file or directory stem.
///
/// - `"01-tipos-de-dados"` → `"01 tipos de dados"`
/// - `"pandas_intro"` → `"pandas intro"`
pub fn fallback_title(stem: &str) -> String {
    stem.replace(['-', '_'], " ").trim().to_string()
}

/// Convert text to a URL-fragment-safe slug.
///
/// Lowercases, folds Latin diacritics to their ASCII base letters, collapses
/// every run of other characters into a single `-`, and trims leading and
/// trailing hyphens. Returns an empty string when nothing survives; callers
/// that need a non-empty token use [`slugify_or`].
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    let mut buf = [0u8; 4];

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            let lower = c.to_ascii_lowercase().encode_utf8(&mut buf);
            push_slug_part(&mut slug, &mut pending_dash, lower);
        } else if let Some(folded) = fold_diacritic(c) {
            push_slug_part(&mut slug, &mut pending_dash, folded);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Like [`slugify`], but never empty: falls back to `default`.
pub fn slugify_or(text: &str, default: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        default.to_string()
    } else {
        slug
    }
}

fn push_slug_part(slug: &mut String, pending_dash: &mut bool, part: &str) {
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push_str(part);
}

/// ASCII replacement for common Latin letters with diacritics.
///
/// Covers Latin-1 Supplement and the frequently used part of Latin
/// Extended-A. Returns lowercase output regardless of input case.
fn fold_diacritic(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä'
        | 'Å' | 'Ā' | 'Ă' | 'Ą' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'ć' | 'č' | 'Ç' | 'Ć' | 'Č' => "c",
        'ď' | 'đ' | 'ð' | 'Ď' | 'Đ' | 'Ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' | 'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė'
        | 'Ę' | 'Ě' => "e",
        'ğ' | 'Ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' | 'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => "i",
        'ł' | 'ľ' | 'Ł' | 'Ľ' => "l",
        'ñ' | 'ń' | 'ň' | 'Ñ' | 'Ń' | 'Ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø'
        | 'Ō' | 'Ő' => "o",
        'œ' | 'Œ' => "oe",
        'ř' | 'Ř' => "r",
        'ś' | 'š' | 'ş' | 'Ś' | 'Š' | 'Ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' | 'Ť' | 'Ţ' => "t",
        'þ' | 'Þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' | 'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů'
        | 'Ű' | 'Ų' => "u",
        'ý' | 'ÿ' | 'Ý' | 'Ÿ' => "y",
        'ź' | 'ż' | 'ž' | 'Ź' | 'Ż' | 'Ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Hands out anchors that are unique within one rendered page.
///
/// The first request for a slug gets it unchanged; later requests for the
/// same slug get `-2`, `-3`, … appended. Suffixed results are themselves
/// reserved, so an explicit `intro-2` heading cannot be handed out twice.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    seen: HashMap<String, u32>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique anchor derived from `text`.
    pub fn anchor_for(&mut self, text: &str, default: &str) -> String {
        let base = slugify_or(text, default);
        self.claim(base)
    }

    /// Reserve `base` (already a slug or an explicit id), suffixing on collision.
    pub fn claim(&mut self, base: String) -> String {
        let Some(count) = self.seen.get(&base).copied() else {
            self.seen.insert(base.clone(), 1);
            return base;
        };

        let mut n = count + 1;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base, n);
                self.seen.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}
