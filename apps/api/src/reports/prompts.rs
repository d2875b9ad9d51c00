// Prompt text for brand sentiment analysis (BSA) reports.

/// System prompt shared by every provider.
pub const BSA_REPORT_SYSTEM: &str = "You are a senior brand strategist for hospitality brands. \
    You write quarterly brand sentiment analysis reports from guest reviews, social mentions \
    and survey data. Be specific, cite the data you were given, and never invent figures. \
    Write in clear business English using markdown headings.";

/// Report prompt template. Replace `{client_name}`, `{quarter}`, `{year}` and
/// `{data_source}` before sending.
pub const BSA_REPORT_PROMPT_TEMPLATE: &str = r#"Prepare the brand sentiment analysis report for {client_name} covering {quarter} {year}.

Structure the report with these sections:
1. Executive Summary
2. Overall Sentiment (positive / neutral / negative split, with trend versus the prior quarter when the data allows)
3. Key Themes (what guests praise, what they complain about)
4. Channel Breakdown (reviews, social, surveys; only channels present in the data)
5. Competitive Notes (only if the data mentions competitors)
6. Recommendations (3 to 5 concrete actions for the marketing team)

If the data is too thin to support a section, say so in one sentence instead of guessing.

SOURCE DATA:
{data_source}"#;
