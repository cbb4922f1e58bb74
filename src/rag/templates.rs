//! Template answers composed from retrieved documentation
//!
//! Used when no chat backend is available, or when a chat call fails.

use serde::{Deserialize, Serialize};

/// Bullet points taken from the context at most
pub const MAX_BULLETS: usize = 5;

/// Shorter sentences carry no useful information
const MIN_SENTENCE_CHARS: usize = 10;

const NO_DETAILS: &str = "Please refer to the documentation for detailed information.";

/// What kind of answer the question calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Connection,
    ApiSdk,
    Sso,
    Glossary,
    General,
}

impl Intent {
    /// Query words that trigger this intent
    fn triggers(&self) -> &'static [&'static str] {
        match self {
            Intent::Connection => &["connect", "setup", "configure", "integration"],
            Intent::ApiSdk => &["api", "sdk", "python", "java", "code"],
            Intent::Sso => &["sso", "authentication", "login", "okta", "azure"],
            Intent::Glossary => &["glossary", "term", "definition"],
            Intent::General => &[],
        }
    }

    /// Context words used to pick sentences for this intent
    fn extraction_keywords(&self) -> &'static [&'static str] {
        match self {
            Intent::Connection => &["setup", "configure", "connect", "integration"],
            Intent::ApiSdk => &["api", "sdk", "python", "java", "client"],
            Intent::Sso => &["sso", "saml", "okta", "azure", "authentication"],
            Intent::Glossary => &["glossary", "term", "definition", "categor"],
            Intent::General => &[],
        }
    }
}

/// First intent whose trigger words appear in `query`
pub fn detect_intent(query: &str) -> Intent {
    let lower = query.to_lowercase();
    [Intent::Connection, Intent::ApiSdk, Intent::Sso, Intent::Glossary]
        .into_iter()
        .find(|intent| intent.triggers().iter().any(|w| lower.contains(w)))
        .unwrap_or(Intent::General)
}

/// Up to [`MAX_BULLETS`] context sentences mentioning any keyword, as bullets
///
/// Sentences are split on periods. Falls back to a pointer at the docs when
/// nothing matches.
pub fn extract_relevant_info(context: &str, keywords: &[&str]) -> String {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let bullets: Vec<String> = context
        .split('.')
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            keywords.iter().any(|k| lower.contains(k.as_str()))
        })
        .take(MAX_BULLETS)
        .map(|sentence| format!("• {}", sentence))
        .collect();

    if bullets.is_empty() {
        NO_DETAILS.to_string()
    } else {
        bullets.join("\n")
    }
}

/// Compose a full template answer for `query` from `context`
pub fn compose_answer(query: &str, context: &str) -> String {
    let intent = detect_intent(query);
    match intent {
        Intent::Connection => format!(
            "Based on the Atlan documentation, here are the key steps for setting up data source connections:\n\n\
             **General Connection Process:**\n\
             1. Navigate to Admin > Integrations in your Atlan workspace\n\
             2. Select the appropriate data source connector\n\
             3. Provide connection credentials and configuration details\n\
             4. Test the connection to ensure it's working properly\n\
             5. Configure automated crawling and discovery settings\n\n\
             **Specific Configuration:**\n{}\n\n\
             **Next Steps:**\n\
             - Test the connection thoroughly before enabling automated crawling\n\
             - Set up appropriate governance policies for the new data source\n\n\
             For detailed configuration instructions specific to your data source, please refer to the full documentation.",
            extract_relevant_info(context, intent.extraction_keywords())
        ),
        Intent::ApiSdk => format!(
            "Based on the Atlan Developer Documentation:\n\n\
             **Available SDKs:**\n\
             - Python SDK: `pip install pyatlan`\n\
             - Java SDK: available via Maven Central\n\n\
             **Key API Operations:**\n{}\n\n\
             **Authentication:**\n\
             All API calls require an API key. Generate your API key from the Admin panel in your Atlan workspace.\n\n\
             For the complete API reference and code examples, visit the Atlan Developer Hub.",
            extract_relevant_info(context, intent.extraction_keywords())
        ),
        Intent::Sso => format!(
            "Based on the Atlan SSO Documentation:\n\n\
             **Supported Identity Providers:**\n\
             - OKTA\n\
             - Azure Active Directory\n\
             - Google Workspace\n\
             - Generic SAML 2.0 providers\n\n\
             **Configuration Steps:**\n{}\n\n\
             **Important Notes:**\n\
             - Ensure your identity provider certificate is valid and properly formatted\n\
             - Map user attributes correctly (email, name, groups)\n\
             - Test with a single user before rolling out to everyone\n\n\
             For step-by-step configuration guides, refer to the SSO documentation section.",
            extract_relevant_info(context, intent.extraction_keywords())
        ),
        Intent::Glossary => format!(
            "Based on the Atlan Glossary documentation:\n\n\
             **Glossary Details:**\n{}\n\n\
             **Getting Started:**\n\
             1. Create a glossary container for your business domain\n\
             2. Add terms with clear definitions\n\
             3. Organize terms into categories\n\
             4. Link terms to the data assets they describe\n\n\
             For bulk imports and approval workflows, refer to the glossary documentation.",
            extract_relevant_info(context, intent.extraction_keywords())
        ),
        Intent::General => {
            let lower = query.to_lowercase();
            let words: Vec<&str> = lower.split_whitespace().collect();
            format!(
                "Based on the Atlan documentation:\n\n\
                 **Key Information:**\n{}\n\n\
                 **Atlan Core Features:**\n\
                 - Data Discovery: search and explore data assets across your organization\n\
                 - Automated Lineage: track data flow and dependencies\n\
                 - Data Governance: implement policies and ensure compliance\n\
                 - Integrations: connect with 100+ data sources and tools\n\n\
                 If you need more specific guidance, please refer to the complete Atlan documentation or contact our support team.",
                extract_relevant_info(context, &words)
            )
        }
    }
}
