//! Deterministic category rules mapping export categories (or merchant text)
//! onto the fixed bucket taxonomy.
//!
//! Rules are an ordered list evaluated first-match-wins. Order matters: a
//! grocery keyword has to be tried before the generic "market" catch-all in
//! shopping, restaurants before services, and so on.

use regex::Regex;

use crate::record::Bucket;

/// Anything that can decide whether a rule applies to a piece of text.
///
/// The text handed to `matches` is already lower-cased.
pub trait Matcher: Send + Sync {
    fn matches(&self, text: &str) -> bool;
}

/// Regex-backed matcher
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(source)?))
    }
}

impl Matcher for Pattern {
    fn matches(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

/// Substring matcher over a fixed keyword list
#[derive(Debug, Clone)]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }
}

impl Matcher for Keywords {
    fn matches(&self, text: &str) -> bool {
        self.0.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Matches when any inner matcher does
pub struct AnyOf(Vec<Box<dyn Matcher>>);

impl AnyOf {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self(matchers)
    }
}

impl Matcher for AnyOf {
    fn matches(&self, text: &str) -> bool {
        self.0.iter().any(|m| m.matches(text))
    }
}

impl<F> Matcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, text: &str) -> bool {
        self(text)
    }
}

/// One `(bucket, matcher)` entry of the rule table
pub struct Rule {
    pub bucket: Bucket,
    matcher: Box<dyn Matcher>,
}

impl Rule {
    pub fn new(bucket: Bucket, matcher: impl Matcher + 'static) -> Self {
        Self {
            bucket,
            matcher: Box::new(matcher),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.matches(text)
    }
}

/// Ordered, first-match-wins categorizer
pub struct Categorizer {
    rules: Vec<Rule>,
}

impl Categorizer {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in rule table.
    pub fn reference() -> Result<Self, regex::Error> {
        let rules = vec![
            Rule::new(
                Bucket::Groceries,
                AnyOf::new(vec![
                    Box::new(Pattern::new(r"grocery|grocer|supermarket|\bmarket\b")?),
                    Box::new(Keywords::new([
                        "trader joe",
                        "whole foods",
                        "aldi",
                        "kroger",
                        "safeway",
                        "publix",
                        "wegmans",
                        "h-e-b",
                        "food lion",
                        "sprouts",
                        "wholesale",
                    ])),
                ]),
            ),
            Rule::new(
                Bucket::Restaurants,
                Pattern::new(
                    r"restaurant|\bbars?\b|cafe|café|coffee|pizza|wings|chicken|chipotle|grubhub|uber\s*eats|doordash",
                )?,
            ),
            Rule::new(
                Bucket::ShoppingRetail,
                Pattern::new(
                    r"retail|shopping|store|department|target|walmart|shein|uniqlo|\bh&m\b|clothing|fashion|apparel|jewelry|fragrance|marketplace|internet\s*purchase|online|amazon",
                )?,
            ),
            Rule::new(
                Bucket::Subscriptions,
                AnyOf::new(vec![
                    Box::new(Pattern::new(r"subscription|membership|service\s*fee")?),
                    Box::new(Keywords::new(["spotify", "netflix", "prime", "hulu", "patreon"])),
                ]),
            ),
            Rule::new(
                Bucket::TransportFuel,
                Pattern::new(
                    r"fuel|\bgas\b|shell|exxon|citgo|transport|taxi|rideshare|lyft|uber|metro|train|amtrak|nouria",
                )?,
            ),
            Rule::new(
                Bucket::Travel,
                Pattern::new(
                    r"hotel|lodging|airline|flight|delta|southwest|jetblue|booking|airbnb|travel",
                )?,
            ),
            Rule::new(
                Bucket::HealthPharmacy,
                Pattern::new(r"pharmacy|\bcvs\b|walgreens|health|clinic|medical|drugstore")?,
            ),
            Rule::new(
                Bucket::Entertainment,
                Pattern::new(
                    r"entertainment|cinema|movie|concert|\bevents?\b|gametime|\blime\b|theatre|theater",
                )?,
            ),
            Rule::new(
                Bucket::Education,
                Pattern::new(r"education|school|tuition|course|\bbooks?\b|mcgraw|wall\s*street\s*prep")?,
            ),
            Rule::new(
                Bucket::Services,
                Pattern::new(r"services?\b|barber|repair|\bvip\b")?,
            ),
            Rule::new(
                Bucket::Utilities,
                Pattern::new(r"utility|utilities|electric|water|internet\s*bill|phone\s*bill|mobile\s*bill")?,
            ),
        ];
        Ok(Self::new(rules))
    }

    /// Map raw text to a bucket. Total: unmatched input is `Other`.
    pub fn categorize(&self, raw: &str) -> Bucket {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return Bucket::Other;
        }
        self.rules
            .iter()
            .find(|r| r.matches(&text))
            .map(|r| r.bucket)
            .unwrap_or(Bucket::Other)
    }
}
