//! Merchant name canonicalization.
//!
//! Turns noisy statement descriptors such as
//! `APPLE PAY AMZN MKTP US*2K3LM1234` or `STARBUCKS STORE 12345 SEATTLE WA`
//! into short display labels (`Amazon`, `Starbucks`). Cleaning is pure,
//! never fails and is idempotent: cleaning a cleaned label returns it as is.

use regex::Regex;
use spendlens_core::NO_DESCRIPTION;
use unicode_normalization::UnicodeNormalization;

const STATE_CODES: &str = "AL|AK|AZ|AR|CA|CO|CT|DE|DC|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|PR|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY";

/// Words that open a multi-word city name (`SAN FRANCISCO`, `SALT LAKE CITY`).
const CITY_PREFIXES: &[&str] = &[
    "BATON", "BEVERLY", "BOCA", "CEDAR", "COLORADO", "CORPUS", "DES", "EAST", "EL", "FORT", "FT",
    "GRAND", "JERSEY", "KANSAS", "LA", "LAKE", "LAS", "LONG", "LOS", "MOUNT", "MT", "NEW", "NORTH",
    "OKLAHOMA", "PALM", "PALO", "PORT", "SAINT", "SALT", "SAN", "SANTA", "SIOUX", "SOUTH", "ST",
    "VIRGINIA", "WEST",
];

/// A city never runs longer than this many words.
const MAX_CITY_WORDS: usize = 3;

/// Ordered brand rewrites, applied to letters-only text.
const BRANDS: &[(&str, &str)] = &[
    (r"(?i)\b(?:amzn|amazon)(?:\s+(?:mktp|mktpl|mkt|marketplace|com|us|retail|digital|services))*\b", "Amazon"),
    (r"(?i)\bwal\s*mart(?:\s+(?:supercenter|super\s+center|store|stores|com|grocery))*\b", "Walmart"),
    (r"(?i)\bwm\s+supercenter\b", "Walmart"),
    (r"(?i)\b(?:starbucks|sbux)(?:\s+(?:store|coffee|card|reload))*\b", "Starbucks"),
    (r"(?i)\bmc\s*donald(?:\s*s)?\b", "McDonald's"),
    (r"(?i)\btrader\s+joe(?:\s*s)?\b", "Trader Joe's"),
    (r"(?i)\bwhole\s*foods?(?:\s+(?:market|mkt))?\b", "Whole Foods"),
    (r"(?i)\btarget(?:\s+com)?\b", "Target"),
    (r"(?i)\bcostco(?:\s+(?:whse|wholesale|gas))*\b", "Costco"),
    (r"(?i)\bnetflix(?:\s+com)?\b", "Netflix"),
    (r"(?i)\bspotify(?:\s+(?:usa|us|com))*\b", "Spotify"),
    (r"(?i)\buber\s*eats\b", "Uber Eats"),
    (r"(?i)\buber(?:\s+(?:trip|trips|ride|rides|help|com|bv))+\b", "Uber"),
    (r"(?i)\blyft(?:\s+(?:ride|rides|inc))*\b", "Lyft"),
    (r"(?i)\b(?:dd\s+)?door\s*dash\b", "DoorDash"),
    (r"(?i)^eleven\b", "7-Eleven"),
    (r"(?i)\bshell(?:\s+(?:oil|service|station))*\b", "Shell"),
    (r"(?i)\bapple\s+com(?:\s+bill)?\b", "Apple"),
    (r"(?i)\bcvs(?:\s+pharmacy)?\b", "CVS Pharmacy"),
];

/// Spellings that survive title-casing verbatim.
const PRESERVED: &[&str] = &[
    "McDonald's",
    "DoorDash",
    "7-Eleven",
    "CVS",
    "IKEA",
    "USPS",
    "UPS",
    "KFC",
    "BP",
    "IHOP",
    "HEB",
    "TJ Maxx",
    "YouTube",
    "eBay",
    "iTunes",
];

pub struct MerchantCleaner {
    wallet: Regex,
    processor: Regex,
    peer: Regex,
    comma_location: Regex,
    state_suffix: Regex,
    hash_ref: Regex,
    number_ref: Regex,
    trailing_number: Regex,
    non_letters: Regex,
    non_alnum: Regex,
    brands: Vec<(Regex, &'static str)>,
    preserved: Vec<(Regex, &'static str)>,
}

impl MerchantCleaner {
    pub fn new() -> Result<Self, regex::Error> {
        let comma_location = format!(
            r"^(?P<head>.*?\S)\s*,\s*[A-Za-z][A-Za-z .'-]*?(?:,\s*|\s+)(?:{STATE_CODES})\s*$"
        );
        let state_suffix = format!(r"(?:,\s*|\s+)(?:{STATE_CODES})\s*$");

        let brands = BRANDS
            .iter()
            .map(|(pattern, name)| Regex::new(pattern).map(|re| (re, *name)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let preserved = PRESERVED
            .iter()
            .map(|word| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).map(|re| (re, *word))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            wallet: Regex::new(r"(?i)\b(?:apple\s*pay|aplpay|apl\s*pay|appl\s*pay|google\s*pay|gpay)\b")?,
            processor: Regex::new(r"(?i)(?:^|\s)(?:pp|sq|tst|bt|olo)\s*\*\s*")?,
            peer: Regex::new(r"(?i)\b(?:paypal|venmo|zelle|cash\s*app)\b")?,
            comma_location: Regex::new(&comma_location)?,
            state_suffix: Regex::new(&state_suffix)?,
            hash_ref: Regex::new(r"\s*#\s*\d{2,5}\s*$")?,
            number_ref: Regex::new(r"(?i)(?:^|\s)no\.?\s*\d{2,5}\s*$")?,
            trailing_number: Regex::new(r"\s+\d{2,5}\s*$")?,
            non_letters: Regex::new(r"[^\p{L}]+")?,
            non_alnum: Regex::new(r"[^\p{L}\p{N}]+")?,
            brands,
            preserved,
        })
    }

    /// Clean a raw description into a display label.
    pub fn clean(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed == NO_DESCRIPTION {
            return NO_DESCRIPTION.to_string();
        }

        let text: String = trimmed.nfkc().collect();
        let text = self.strip_payment_tokens(&text);
        let text = self.strip_location(text.trim());
        let text = self.strip_references(&text);

        let letters = self.letters_only(&text);
        if letters.is_empty() {
            return NO_DESCRIPTION.to_string();
        }

        let branded = self.apply_brands(letters);
        let cased = self.preserve_brands(&title_case(&branded));
        let label = collapse_repeats(&cased);

        if label.chars().count() <= 1 || label.eq_ignore_ascii_case("the") {
            return self.minimal(trimmed);
        }
        label
    }

    fn strip_payment_tokens(&self, text: &str) -> String {
        let text = self.wallet.replace_all(text, " ");
        let text = self.processor.replace_all(&text, " ");
        self.peer.replace_all(&text, " ").into_owned()
    }

    /// Drop a trailing `CITY ST` or `, CITY, ST` suffix.
    ///
    /// Without a comma the city starts after a store number when there is
    /// one (`STORE 12345 NEW YORK NY`). Otherwise it is the last word plus
    /// any known prefix words before it. When that would leave fewer than
    /// two merchant words only the state code goes (`HOME DEPOT ME`).
    fn strip_location(&self, text: &str) -> String {
        if let Some(caps) = self.comma_location.captures(text) {
            return caps["head"].to_string();
        }
        let Some(state) = self.state_suffix.find(text) else {
            return text.to_string();
        };

        let words: Vec<&str> = text[..state.start()].split_whitespace().collect();
        let run = words.iter().rev().take_while(|w| is_city_word(w)).count();
        if run == 0 {
            return text.to_string();
        }

        let split = words.len() - run;
        let anchored = split > 0 && words[split - 1].chars().any(|c| c.is_ascii_digit());
        let (city_len, min_head) = if anchored {
            (run.min(MAX_CITY_WORDS), 1)
        } else {
            let prefixes = words[..words.len() - 1]
                .iter()
                .rev()
                .take(MAX_CITY_WORDS - 1)
                .take_while(|w| CITY_PREFIXES.contains(&w.trim_end_matches(',')))
                .count();
            ((prefixes + 1).min(run), 2)
        };

        let head = &words[..words.len() - city_len];
        let merchant_words = head.iter().filter(|w| w.chars().any(char::is_alphabetic)).count();
        if merchant_words < min_head {
            return words.join(" ");
        }
        head.join(" ")
    }

    fn strip_references(&self, text: &str) -> String {
        let mut current = text.trim().to_string();
        loop {
            let next = if self.hash_ref.is_match(&current) {
                self.hash_ref.replace(&current, "").into_owned()
            } else if self.number_ref.is_match(&current) {
                self.number_ref.replace(&current, "").into_owned()
            } else if self.trailing_number.is_match(&current) {
                self.trailing_number.replace(&current, "").into_owned()
            } else {
                strip_trailing_code(&current)
            };
            let next = next.trim().to_string();
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn letters_only(&self, text: &str) -> String {
        // "Joe's" reads better as "Joes" than "Joe s"
        let elided = text.replace(['\'', '\u{2019}'], "");
        self.non_letters
            .replace_all(&elided, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn apply_brands(&self, text: String) -> String {
        self.brands.iter().fold(text, |acc, (re, name)| {
            re.replace_all(&acc, *name).into_owned()
        })
    }

    fn preserve_brands(&self, text: &str) -> String {
        self.preserved
            .iter()
            .fold(text.to_string(), |acc, (re, word)| {
                re.replace_all(&acc, *word).into_owned()
            })
    }

    /// Punctuation-only cleanup used when aggressive cleaning degenerates.
    fn minimal(&self, raw: &str) -> String {
        let text: String = raw.nfkc().collect();
        let out = self
            .non_alnum
            .replace_all(&text, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if out.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            out
        }
    }
}

/// Drop the last token when it is a reference code with 3+ digits
/// (`US*2K3LM1234`, `T-0042`, `1234567`).
fn strip_trailing_code(text: &str) -> String {
    let (head, token) = match text.rsplit_once(char::is_whitespace) {
        Some((head, token)) => (head, token),
        None => ("", text),
    };
    let digits = token.chars().filter(char::is_ascii_digit).count();
    let code_like = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '#' | '-' | '.' | '/' | '_'));
    if digits >= 3 && code_like {
        head.to_string()
    } else {
        text.to_string()
    }
}

fn is_city_word(word: &str) -> bool {
    let word = word.trim_end_matches(',');
    word.starts_with(|c: char| c.is_ascii_alphabetic())
        && word
            .chars()
            .all(|c| c.is_ascii_alphabetic() || matches!(c, '.' | '\'' | '-'))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_repeats(text: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        if words
            .last()
            .is_some_and(|prev| prev.to_lowercase() == word.to_lowercase())
        {
            continue;
        }
        words.push(word);
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> String {
        MerchantCleaner::new().unwrap().clean(raw)
    }

    #[test]
    fn test_wallet_marker_and_store_code_stripped() {
        assert_eq!(clean("APPLE PAY AMZN MKTP US*123456"), "Amazon");
        assert_eq!(clean("APLPAY AMAZON.COM"), "Amazon");
    }

    #[test]
    fn test_location_and_store_numbers() {
        assert_eq!(clean("STARBUCKS STORE 12345 SEATTLE WA"), "Starbucks");
        assert_eq!(clean("WAL-MART SUPERCENTER #1234"), "Walmart");
        assert_eq!(clean("CVS/PHARMACY #1234 BOSTON MA"), "CVS Pharmacy");
        assert_eq!(clean("JOE'S PIZZA, NEW YORK, NY"), "Joes Pizza");
        assert_eq!(clean("HARDWARE STORE No. 42"), "Hardware Store");
    }

    #[test]
    fn test_multi_word_city_removed_whole() {
        assert_eq!(clean("STARBUCKS STORE 12345 NEW YORK NY"), "Starbucks");
        assert_eq!(clean("SHELL OIL 57444 LAS VEGAS NV"), "Shell");
        assert_eq!(clean("KROGER 0412 SALT LAKE CITY UT"), "Kroger");
        assert_eq!(clean("BLUE BOTTLE COFFEE SAN FRANCISCO CA"), "Blue Bottle Coffee");
    }

    #[test]
    fn test_short_name_before_state_is_kept() {
        assert_eq!(clean("HOME DEPOT ME"), "Home Depot");
        assert_eq!(clean("STARBUCKS SEATTLE, WA"), "Starbucks Seattle");
    }

    #[test]
    fn test_processor_and_peer_prefixes() {
        assert_eq!(clean("SQ *BLUE BOTTLE COFFEE"), "Blue Bottle Coffee");
        assert_eq!(clean("TST* JOE'S PIZZA 0042 BROOKLYN NY"), "Joes Pizza");
        assert_eq!(clean("PAYPAL *NETFLIX"), "Netflix");
    }

    #[test]
    fn test_brand_spellings_survive_title_case() {
        assert_eq!(clean("MCDONALD'S F1234"), "McDonald's");
        assert_eq!(clean("DD DOORDASH BURGERS"), "DoorDash Burgers");
        assert_eq!(clean("Trader Joe's #123"), "Trader Joe's");
        assert_eq!(clean("7-ELEVEN 12345"), "7-Eleven");
    }

    #[test]
    fn test_repeated_words_collapse() {
        assert_eq!(clean("SHELL SHELL"), "Shell");
        assert_eq!(clean("shell oil shell"), "Shell");
    }

    #[test]
    fn test_empty_and_degenerate_input() {
        assert_eq!(clean(""), NO_DESCRIPTION);
        assert_eq!(clean("   "), NO_DESCRIPTION);
        assert_eq!(clean("#!*"), NO_DESCRIPTION);
        assert_eq!(clean(NO_DESCRIPTION), NO_DESCRIPTION);
        // single letter after cleaning falls back to the punctuation-only form
        assert_eq!(clean("A 12"), "A 12");
        assert_eq!(clean("THE"), "THE");
    }

    #[test]
    fn test_unicode_is_normalized() {
        // fullwidth letters fold to ASCII under NFKC
        assert_eq!(clean("ＮＥＴＦＬＩＸ"), "Netflix");
        assert_eq!(clean("CAFÉ DE FLORE"), "Café De Flore");
    }

    #[test]
    fn test_idempotent() {
        let cleaner = MerchantCleaner::new().unwrap();
        let inputs = [
            "APPLE PAY AMZN MKTP US*123456",
            "STARBUCKS STORE 12345 SEATTLE WA",
            "STARBUCKS STORE 12345 NEW YORK NY",
            "SHELL OIL 57444 LAS VEGAS NV",
            "BLUE BOTTLE COFFEE SAN FRANCISCO CA",
            "HOME DEPOT ME",
            "MCDONALD'S F1234",
            "CVS/PHARMACY #1234 BOSTON MA",
            "DD DOORDASH BURGERS",
            "7-ELEVEN 12345",
            "Trader Joe's #123",
            "UBER TRIP HELP.UBER.COM CA",
            "A 12",
            "THE",
            "",
            "local bakery",
        ];
        for input in inputs {
            let once = cleaner.clean(input);
            assert_eq!(cleaner.clean(&once), once, "not idempotent for {input:?}");
        }
    }
}
