//! Bundled stop-word lists

use super::StopWords;
use std::collections::HashSet;

/// A fixed set of stop words, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopList {
    words: HashSet<String>,
}

impl StopList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StopList {
            words: words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl StopWords for StopList {
    fn is_stop(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }
}

const LATIN: &[&str] = &[
    "ab", "ac", "ad", "adhic", "aliqui", "aliquis", "an", "ante", "apud", "at", "atque", "aut",
    "autem", "cum", "cur", "de", "deinde", "dum", "ego", "enim", "ergo", "es", "est", "et",
    "etiam", "etsi", "ex", "fio", "haud", "hic", "iam", "idem", "igitur", "ille", "in", "infra",
    "inter", "interim", "ipse", "is", "ita", "magis", "modo", "mox", "nam", "ne", "nec", "necque",
    "neque", "nisi", "non", "nos", "o", "ob", "per", "possum", "post", "pro", "quae", "quam",
    "quare", "qui", "quia", "quicumque", "quidem", "quilibet", "quis", "quisnam", "quisquam",
    "quisque", "quisquis", "quo", "quoniam", "sed", "si", "sic", "sive", "sub", "sui", "sum",
    "super", "suus", "tam", "tamen", "trans", "tu", "tum", "ubi", "uel", "uero", "unus", "ut",
];

const ANCIENT_GREEK: &[&str] = &[
    "αὐτὸς", "αὐτός", "γε", "γὰρ", "γάρ", "δ'", "δαὶ", "δαὶς", "δαί", "δαίς", "διὰ", "διά", "δὲ",
    "δέ", "δὴ", "δή", "εἰ", "εἰμὶ", "εἰμί", "εἰς", "εἴμι", "κατὰ", "κατά", "καί", "καὶ", "μετὰ",
    "μετά", "μὲν", "μέν", "μὴ", "μή", "οἱ", "οὐ", "οὐδεὶς", "οὐδείς", "οὐδὲ", "οὐδέ", "οὐκ",
    "οὔτε", "οὕτως", "οὖν", "οὗτος", "παρὰ", "παρά", "περὶ", "περί", "πρὸς", "πρός", "σὺ", "σύ",
    "σύν", "ξύν", "τε", "τις", "τινα", "τὰ", "τά", "τὴν", "τήν", "τὸ", "τό", "τοῖς", "τοὺς",
    "τοῦ", "τῆς", "τῷ", "τῶν", "ἀλλ'", "ἀλλὰ", "ἀλλά", "ἀπὸ", "ἀπό", "ἂν", "ἄλλος", "ἄν", "ἄρα",
    "ἐγὼ", "ἐγώ", "ἐκ", "ἐξ", "ἐμός", "ἐν", "ἐπὶ", "ἐπί", "ἐὰν", "ἑαυτοῦ", "ἔτι", "ἡ", "ἢ", "ἤ",
    "ὁ", "ὃδε", "ὅδε", "ὃς", "ὅς", "ὅστις", "ὅτι", "ὑμός", "ὑπὲρ", "ὑπέρ", "ὑπὸ", "ὑπό", "ὡς",
    "ὥστε", "ὦ",
];

pub fn latin() -> StopList {
    StopList::new(LATIN)
}

pub fn ancient_greek() -> StopList {
    StopList::new(ANCIENT_GREEK)
}
