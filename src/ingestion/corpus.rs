//! Documentation categories and the bundled fallback corpus
//!
//! The bundled documents are always part of the knowledge store, so answers
//! remain possible when every scrape fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Documentation category a chunk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocCategory {
    Product,
    ApiSdk,
    HowTo,
    Sso,
    BestPractices,
    Glossary,
}

impl DocCategory {
    pub const ALL: [DocCategory; 6] = [
        DocCategory::Product,
        DocCategory::ApiSdk,
        DocCategory::HowTo,
        DocCategory::Sso,
        DocCategory::BestPractices,
        DocCategory::Glossary,
    ];

    /// Configuration key, e.g. `api_sdk`
    pub fn key(&self) -> &'static str {
        match self {
            DocCategory::Product => "product",
            DocCategory::ApiSdk => "api_sdk",
            DocCategory::HowTo => "how_to",
            DocCategory::Sso => "sso",
            DocCategory::BestPractices => "best_practices",
            DocCategory::Glossary => "glossary",
        }
    }

    /// Synthetic source id for the bundled document of this category
    pub fn bundled_source(&self) -> String {
        format!("Atlan Documentation ({})", self.key())
    }
}

impl fmt::Display for DocCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DocCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocCategory::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("Unknown documentation category: {}", s))
    }
}

/// Where a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkOrigin {
    Bundled,
    Scraped,
}

/// A document ready to be chunked
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub source: String,
    pub category: DocCategory,
    pub origin: ChunkOrigin,
    pub text: String,
}

/// Bundled documents, one per category
pub fn bundled_documents() -> Vec<SourceDocument> {
    DocCategory::ALL
        .iter()
        .map(|category| SourceDocument {
            source: category.bundled_source(),
            category: *category,
            origin: ChunkOrigin::Bundled,
            text: bundled_text(*category).to_string(),
        })
        .collect()
}

/// Bundled text for a category
pub fn bundled_text(category: DocCategory) -> &'static str {
    match category {
        DocCategory::Product => PRODUCT_DOC,
        DocCategory::ApiSdk => API_SDK_DOC,
        DocCategory::HowTo => HOW_TO_DOC,
        DocCategory::Sso => SSO_DOC,
        DocCategory::BestPractices => BEST_PRACTICES_DOC,
        DocCategory::Glossary => GLOSSARY_DOC,
    }
}

const PRODUCT_DOC: &str = r#"
# Atlan Product Documentation

## Overview
Atlan is a modern data catalog that helps organizations discover, understand, and govern their data assets at scale.

## Key Features
- **Data Discovery**: Search and explore data assets across your organization.
- **Automated Lineage**: Track data flow and dependencies automatically.
- **Data Governance**: Implement policies and ensure compliance.
- **Collaboration**: Work together on data projects with built-in social features.
- **Integrations**: Connect with 100+ data sources and tools.

## Getting Started
1. Connect your first data source through the Integrations panel.
2. Set up automated crawling to discover assets.
3. Configure governance policies and assign data stewards.
4. Start exploring your data through the catalog interface.

## Popular Connectors
- Snowflake: Enterprise data warehouse connector.
- Databricks: Unity Catalog integration for lakehouse architecture.
- Power BI: Business intelligence and reporting connector.
- PostgreSQL: Relational database connector.
- dbt: Data transformation workflow integration.
"#;

const API_SDK_DOC: &str = r#"
# Atlan Developer Documentation

## SDKs and APIs

### Python SDK
Install the Python SDK with pip install pyatlan.
Initialize the client with your tenant base URL and API key, for example AtlanClient(base_url="https://tenant.atlan.com", api_key="your-api-key").
Search assets with client.asset.search(query="sales_data").
Create custom attributes with client.typedef.create_custom_attribute(name="data_owner", display_name="Data Owner", type="string").

### Java SDK
The Java SDK is available via Maven Central. Add the com.atlan atlan-java dependency to your pom.xml.

### REST API Endpoints
- Assets: /api/meta/entity/bulk handles bulk asset operations.
- Search: /api/meta/search/basic searches across the catalog.
- Lineage: /api/meta/lineage/entity queries lineage information.
- Types: /api/meta/types/typedefs manages custom type definitions.

### Authentication
All API calls require API key authentication in the header: Authorization: Bearer YOUR_API_KEY.
Generate your API key from the Admin panel.
"#;

const HOW_TO_DOC: &str = r#"
# How-To Guides

## Connecting Data Sources

### Snowflake Connection
1. Navigate to Admin > Integrations > Snowflake.
2. Enter connection details: account URL (e.g. https://xy12345.snowflakecomputing.com), username and password, warehouse, database, and schema.
3. Test connection and save.
4. Configure crawling schedule.

### Databricks Unity Catalog
1. Go to Admin > Integrations > Databricks.
2. Provide the server hostname, HTTP path, and a personal access token.
3. Enable Unity Catalog integration.
4. Set up automated discovery.

## Creating Data Lineage
1. Ensure source systems are properly connected.
2. Use dbt integration for transformation lineage.
3. Configure custom lineage via API if needed.
4. View lineage in the asset detail page.

## Setting Up Governance
1. Define data domains and assign domain leads.
2. Create classification rules for sensitive data.
3. Set up approval workflows for schema changes.
4. Configure data quality monitoring.
"#;

const SSO_DOC: &str = r#"
# SSO Configuration Guide

## Supported Providers
- OKTA
- Azure Active Directory
- Google Workspace
- Generic SAML 2.0

## OKTA Setup
1. Create a new SAML application in the OKTA admin console.
2. Configure the application with these URLs: single sign on URL https://your-tenant.atlan.com/api/service/saml/login and audience URI https://your-tenant.atlan.com.
3. Download the OKTA certificate.
4. In the Atlan Admin panel, upload the OKTA certificate, configure the SAML endpoint URL, and map user attributes (email, name, groups).
5. Test the SSO integration with a user account.

## Azure AD Setup
1. Register Atlan as an Enterprise Application.
2. Configure SAML-based sign-on with identifier https://your-tenant.atlan.com and reply URL https://your-tenant.atlan.com/api/service/saml/login.
3. Configure claims: Name ID is user.mail and groups are user.assignedroles.
4. Download the federation metadata.
5. Configure SSO in the Atlan admin panel.

## Troubleshooting
- Verify certificate validity and format.
- Check that SAML response attributes match the configuration.
- Ensure users have proper group assignments.
- Test with SAML tracer tools for debugging.
"#;

const BEST_PRACTICES_DOC: &str = r#"
# Data Governance Best Practices

## Data Discovery Strategy
1. Start with High-Value Assets: focus on business-critical datasets first.
2. Automated Discovery: use connectors for comprehensive asset discovery.
3. Consistent Naming: establish and enforce naming conventions.
4. Rich Metadata: add business context, descriptions, and tags.

## Data Ownership and Stewardship
1. Clear Ownership: assign data owners for every important asset.
2. Domain-Driven Approach: organize data by business domains.
3. Stewardship Programs: train and empower data stewards.
4. Accountability: run regular ownership reviews and updates.

## Data Quality Management
1. Proactive Monitoring: set up automated data quality checks.
2. Quality Metrics: define and track key quality indicators.
3. Issue Resolution: establish clear processes for quality issues.
4. Communication: alert stakeholders about quality problems.

## Security and Compliance
1. Data Classification: implement systematic data classification.
2. Access Controls: use attribute-based access control (ABAC).
3. Audit Trails: maintain comprehensive audit logs.
4. Privacy by Design: consider privacy implications in data processes.
"#;

const GLOSSARY_DOC: &str = r#"
# Atlan Glossary Management

## Overview
The Atlan Glossary is a centralized business vocabulary that helps standardize data definitions across your organization. It contains business terms, their definitions, and relationships to data assets.

## Key Features
- AtlasGlossary: root container for all glossary terms.
- AtlasGlossaryTerm: individual business terms with definitions.
- AtlasGlossaryCategory: hierarchical organization of terms.
- Term Relationships: link terms to data assets and other terms.

## Creating and Managing Glossary Terms
1. Create Glossary: set up a new business glossary container.
2. Add Terms: define business terms with clear descriptions.
3. Categorize: organize terms into logical categories.
4. Link to Assets: associate terms with relevant data assets.
5. Set Relationships: define parent-child and related term connections.

## API Operations
- Create or update glossary terms programmatically.
- Bulk import terms from existing systems.
- Query terms and their relationships.
- Manage term approval workflows.
"#;
