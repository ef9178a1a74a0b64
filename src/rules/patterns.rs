//! Ordered pattern tables.
//!
//! Order is significant: category groups are scored in declaration order and
//! the first maximal score wins; threat groups report reasons in this order.
//! Changing the order changes classification results.

use crate::types::Category;

/// One-time-code patterns. Checked before every other category.
pub const OTP_PATTERNS: &[&str] = &[
    r"\b\d{4,6}\b.*(?:otp|code|verification|verify|password)",
    r"(?:otp|code|verification).*\b\d{4,6}\b",
];

/// Scored category groups, in tie-break order.
pub const CATEGORY_PATTERNS: &[(Category, &[&str])] = &[
    (
        Category::Finance,
        &[
            r"\b(?:bank|account|credit|debit|payment|transaction|balance|rupees?|rs\.?|inr)\b",
            r"\b(?:loan|emi|deposit|withdraw|transfer)\b",
        ],
    ),
    (
        Category::Offers,
        &[
            r"\b(?:offer|discount|sale|deal|cashback|coupon|voucher|reward)\b",
            r"\b(?:\d+%\s*off|flat\s*\d+|upto\s*\d+)\b",
        ],
    ),
    (
        Category::Travel,
        &[
            r"\b(?:flight|train|bus|hotel|booking|journey|ticket|pnr)\b",
            r"\b(?:irctc|makemytrip|goibibo|cleartrip|redbus)\b",
        ],
    ),
    (
        Category::Transactional,
        &[
            r"\b(?:order|delivery|shipped|dispatched|confirmed|receipt)\b",
            r"\b(?:amazon|flipkart|myntra|zomato|swiggy)\b",
        ],
    ),
];

/// URL shorteners plus the generic `http(s)://` catch-all.
///
/// The catch-all means every extracted URL is reported as suspicious.
pub const SUSPICIOUS_LINK_PATTERNS: &[&str] = &[
    r"bit\.ly",
    r"tinyurl",
    r"goo\.gl",
    r"t\.co",
    r"https?://\S+",
];

/// Money transfer and urgent payment requests.
pub const MONEY_REQUEST_PATTERNS: &[&str] = &[
    r"\b(?:send|transfer|pay|deposit).*(?:money|amount|rupees?|rs\.?)\b",
    r"\b(?:urgent|immediately|asap).*(?:payment|money)\b",
    r"\bclick.*link.*(?:verify|update|confirm)\b",
];

/// Account-suspended and verify-your-details phrasing.
pub const IMPERSONATION_PATTERNS: &[&str] = &[
    r"\b(?:your account|account holder|dear customer).*(?:suspended|blocked|locked|expired)\b",
    r"\b(?:update|verify|confirm).*(?:kyc|details|information|account)\b",
];

/// Sender shapes that look generated. Matched case-sensitively against the
/// whole sender string.
pub const SUSPICIOUS_SENDER_PATTERNS: &[&str] = &[r"^[A-Z]{2}-[A-Z]+$", r"^\d{5,}$"];

/// URL grammar used for extraction.
///
/// Scheme is case-insensitive. The body accepts ASCII letters, digits and
/// ``!$%&'()*+,-./:;<=>?@[\]^_``; anything else (whitespace, quotes, `#`,
/// `{|}~`, backtick, non-ASCII) ends the URL.
pub const URL_PATTERN: &str = r"(?i:https?)://[A-Za-z0-9!$%&'()*+,\-./:;<=>?@\[\\\]^_]+";
