//! Prompt text sent to the completion provider.
//!
//! The section headers named in these prompts must stay in sync with the
//! markers in [`crate::services::advisor`].

use crate::services::advisor::{ACTIONABLE_ITEMS_MARKER, FINANCIAL_KEYWORDS_MARKER};

pub const ACTION_ITEMS_SYSTEM: &str = "You are an assistant that extracts actionable items and \
identifies financial keywords from meeting notes.";

pub const ACTION_ITEMS_ONLY_SYSTEM: &str =
    "You are an assistant that extracts actionable items from meeting notes.";

pub const INVESTMENT_ADVICE_SYSTEM: &str = r#"Analyze the financial advisor's notes about recent discussions with a client and the client's wealth information. Based on this analysis, suggest tailored investment strategies suitable for the client's financial situation and goals.

Examples:
Recent Notes:
"The client recently purchased a property outright without taking a loan and keeps substantial liquid cash reserves."
"Rental properties supplement their income with passive cash flow."
"Most of their plan is allocated to safe, long-term investments, including index funds."
Wealth Info:
Liquid Cash Reserves: $500,000
Annual Passive Income: $50,000

Output:
Diversify portfolio further into international index funds for global exposure.
Consider REITs to enhance real estate investment diversification.
Allocate a small percentage (5-10%) to low-risk alternative investments like gold or commodities.

Recent Notes:
"The client works freelance with a moderately stable income that fluctuates occasionally."
"They saved a reasonable amount over five years but worry about the rising cost of living."
"They recently moved part of their savings into high-growth technology stocks. They have no significant debt, but the emergency fund covers only three months of expenses."
Wealth Info:
Savings: $50,000
Portfolio Allocation: 40% Tech Stocks, 60% ETFs
Debt: None

Output:
Increase emergency fund to cover six months of expenses to improve financial resilience.
Shift a portion of high-growth tech stocks to more stable dividend-paying stocks or balanced funds.
Consider low-cost ETFs that offer steady growth and reduce volatility in the portfolio.

Recent Notes:
"The client carries a personal loan, a car loan and a home mortgage."
"Their income is irregular after recent job changes and they rely on credit cards for day-to-day expenses."
"They have no emergency fund or significant savings."
Wealth Info:
Loans: $150,000 (combined)
Savings: None
Income: Irregular ($3,000-$5,000 per month)

Output:
Focus on building an emergency fund before pursuing any investments.
Prioritize paying off high-interest debts like credit cards.
Explore debt consolidation options to lower monthly payments.
Once debt is manageable, consider a conservative approach such as a money market account or low-risk mutual funds.

Task:
Given a new set of recent notes and wealth information, suggest personalized investment strategies that align with the client's financial health and objectives. Make them as specific and actionable as possible, and include something the client has not already considered or implemented.
Use the output format above. Put each strategy on its own line. Do not send anything other than the investment advice."#;

/// User prompt for action-item extraction.
pub fn action_items_prompt(meeting_notes: &str, with_keywords: bool) -> String {
    if with_keywords {
        format!(
            "Please extract actionable items and identify the top 5 best-suited financial \
             keywords from the following meeting notes. If there are none, return an empty \
             list for each.\n\
             List the items under a line reading \"{}\" and the keywords under a line \
             reading \"{}\", one entry per line.\n\n\
             Meeting Notes:\n{}",
            ACTIONABLE_ITEMS_MARKER, FINANCIAL_KEYWORDS_MARKER, meeting_notes
        )
    } else {
        format!(
            "Please extract actionable items from the following meeting notes, one per \
             line. If there are none, return nothing.\n\n\
             Meeting Notes:\n{}",
            meeting_notes
        )
    }
}

/// User prompt for investment advice.
pub fn investment_advice_prompt(meeting_notes: &str, wealth_info: &str) -> String {
    format!(
        "Recent Notes:\n{}\n\nWealth Info:\n{}",
        meeting_notes, wealth_info
    )
}
