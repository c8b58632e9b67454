//! Static keyword-matched knowledge base.
//!
//! Rules are checked in order; the first rule with any matching keyword
//! wins. Unmatched queries get the generic fallback.

/// (keywords, response) rules, most specific first.
const RULES: &[(&[&str], &str)] = &[
    (
        &["private equity", "buyout"],
        "Buyout strategies acquire controlling stakes in mature companies, typically using \
         leverage to enhance returns through operational improvements and financial \
         restructuring. I can help with target screening, valuation metrics, and exit planning.",
    ),
    (
        &["venture capital", "vc"],
        "Venture capital targets early-stage companies with scalable business models, weighting \
         team quality, market size, and competitive position. I can help with diligence \
         checklists and portfolio construction.",
    ),
    (
        &["real estate", "property"],
        "Real estate offers inflation protection and stable cash flows; the numbers to watch \
         are cap rates, NOI growth, and location fundamentals. I can help with market analysis \
         and allocation sizing.",
    ),
    (
        &["infrastructure"],
        "Infrastructure assets deliver long-duration, stable returns through essential-service \
         operators in transport, utilities, and social infrastructure. I can help with \
         regulatory and ESG risk assessment.",
    ),
    (
        &["hedge fund"],
        "Hedge fund strategies span long/short, macro, and relative value; manager selection \
         hinges on process consistency and risk controls. I can help with strategy comparison \
         and fee analysis.",
    ),
    (
        &["artificial intelligence", "ai"],
        "AI exposure spans infrastructure, applications, and enabling technology - compute, \
         data platforms, and the application layer. I can help with market sizing and \
         competitive framing for AI opportunities.",
    ),
    (
        &["quantum"],
        "Quantum computing is a long-horizon theme with applications in cryptography, \
         optimization, and simulation; commercialization timelines remain uncertain. I can map \
         the investment landscape and key players.",
    ),
    (
        &["crypto", "blockchain"],
        "Digital-asset exposure needs careful regulatory and custody risk assessment; \
         infrastructure plays are generally preferred over direct token positions. I can help \
         with risk frameworks and sizing.",
    ),
    (
        &["allocation", "portfolio"],
        "Strategic allocation balances risk, return, and correlation across asset classes \
         against your objectives and horizon. I can help optimize construction and rebalancing \
         policy.",
    ),
    (
        &["due diligence"],
        "Diligence covers financial, operational, legal, and strategic review of an \
         opportunity. I can provide tailored checklists and analysis frameworks per asset \
         class.",
    ),
    (
        &["esg", "sustainability"],
        "ESG integration is increasingly load-bearing for long-term value; I can help with \
         framework design, impact measurement, and compliance mapping.",
    ),
    (
        &["risk", "volatility"],
        "Risk management starts from correlation structure, tail exposure, and scenario \
         analysis. I can help with stress testing, VaR, and risk budgeting.",
    ),
    (
        &["performance", "returns"],
        "Performance review means attribution, benchmarking, and risk-adjusted measures - \
         Sharpe, alpha, drawdown. I can help set up a measurement framework.",
    ),
];

const FALLBACK: &str = "I can help with investment analysis, market insight, and strategic \
                        advisory questions across all asset classes.";

/// Answer a query from the keyword table.
pub fn respond(query: &str) -> String {
    let query = query.to_lowercase();
    for (keywords, response) in RULES {
        if keywords.iter().any(|k| query.contains(k)) {
            return (*response).to_string();
        }
    }
    FALLBACK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert!(respond("Tell me about PRIVATE EQUITY deals").contains("Buyout"));
        assert!(respond("thoughts on real estate?").contains("cap rates"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "private equity buyout risk" hits the buyout rule before the risk rule
        assert!(respond("private equity buyout risk").contains("Buyout"));
    }

    #[test]
    fn test_unmatched_query_gets_fallback() {
        assert_eq!(respond("what's for lunch"), FALLBACK);
    }
}
