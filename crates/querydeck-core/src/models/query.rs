//! Query type and query shape models

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis kind of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Event,
    Funnel,
    Attribution,
    Campaign,
    Kpi,
    Profile,
    Web,
}

impl QueryType {
    pub const ALL: [QueryType; 7] = [
        QueryType::Event,
        QueryType::Funnel,
        QueryType::Attribution,
        QueryType::Campaign,
        QueryType::Kpi,
        QueryType::Profile,
        QueryType::Web,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Event => "event",
            QueryType::Funnel => "funnel",
            QueryType::Attribution => "attribution",
            QueryType::Campaign => "campaign",
            QueryType::Kpi => "kpi",
            QueryType::Profile => "profile",
            QueryType::Web => "web",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownQueryType {
                value: s.to_string(),
            })
    }
}

/// Structural shape of the live query, keyed by query type
///
/// Only the fields that drive chart selection are carried. Each list holds
/// the names of the grouping properties (or attribution models) in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query_type", rename_all = "snake_case")]
pub enum QueryShape {
    Event {
        #[serde(default)]
        breakdown: Vec<String>,
    },
    Funnel {
        #[serde(default)]
        breakdown: Vec<String>,
    },
    Profile {
        #[serde(default)]
        breakdown: Vec<String>,
    },
    Kpi {
        #[serde(default)]
        breakdown: Vec<String>,
    },
    Campaign {
        #[serde(default)]
        group_by: Vec<String>,
    },
    Attribution {
        #[serde(default)]
        models: Vec<String>,
    },
    Web,
}

impl QueryShape {
    /// Build a shape from a query type and whichever lists apply to it.
    ///
    /// Lists that do not belong to the query type are ignored.
    pub fn from_parts(
        query_type: QueryType,
        breakdown: Vec<String>,
        group_by: Vec<String>,
        models: Vec<String>,
    ) -> Self {
        match query_type {
            QueryType::Event => QueryShape::Event { breakdown },
            QueryType::Funnel => QueryShape::Funnel { breakdown },
            QueryType::Profile => QueryShape::Profile { breakdown },
            QueryType::Kpi => QueryShape::Kpi { breakdown },
            QueryType::Campaign => QueryShape::Campaign { group_by },
            QueryType::Attribution => QueryShape::Attribution { models },
            QueryType::Web => QueryShape::Web,
        }
    }

    pub fn query_type(&self) -> QueryType {
        match self {
            QueryShape::Event { .. } => QueryType::Event,
            QueryShape::Funnel { .. } => QueryType::Funnel,
            QueryShape::Profile { .. } => QueryType::Profile,
            QueryShape::Kpi { .. } => QueryType::Kpi,
            QueryShape::Campaign { .. } => QueryType::Campaign,
            QueryShape::Attribution { .. } => QueryType::Attribution,
            QueryShape::Web => QueryType::Web,
        }
    }

    /// Number of breakdown dimensions (0 for shapes without a breakdown)
    pub fn breakdown_count(&self) -> usize {
        match self {
            QueryShape::Event { breakdown }
            | QueryShape::Funnel { breakdown }
            | QueryShape::Profile { breakdown }
            | QueryShape::Kpi { breakdown } => breakdown.len(),
            _ => 0,
        }
    }

    /// Query-type-specific cardinality: campaign group-by or attribution models
    pub fn model_count(&self) -> usize {
        match self {
            QueryShape::Campaign { group_by } => group_by.len(),
            QueryShape::Attribution { models } => models.len(),
            _ => 0,
        }
    }

    pub fn descriptor(&self) -> QueryShapeDescriptor {
        QueryShapeDescriptor {
            query_type: self.query_type(),
            breakdown_count: self.breakdown_count(),
            model_count: self.model_count(),
        }
    }
}

/// Flat summary of a [`QueryShape`], recomputed on demand and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryShapeDescriptor {
    pub query_type: QueryType,
    pub breakdown_count: usize,
    pub model_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("prop_{}", i)).collect()
    }

    #[test]
    fn test_query_type_parse_roundtrip() {
        for t in QueryType::ALL {
            assert_eq!(t.as_str().parse::<QueryType>().unwrap(), t);
        }
        assert!(matches!(
            "path".parse::<QueryType>(),
            Err(CoreError::UnknownQueryType { .. })
        ));
    }

    #[test]
    fn test_from_parts_ignores_foreign_lists() {
        let shape = QueryShape::from_parts(QueryType::Campaign, names(3), names(1), names(2));
        assert_eq!(shape, QueryShape::Campaign { group_by: names(1) });
        assert_eq!(shape.breakdown_count(), 0);
        assert_eq!(shape.model_count(), 1);
    }

    #[test]
    fn test_descriptor() {
        let shape = QueryShape::Kpi { breakdown: names(4) };
        let d = shape.descriptor();
        assert_eq!(d.query_type, QueryType::Kpi);
        assert_eq!(d.breakdown_count, 4);
        assert_eq!(d.model_count, 0);
    }

    #[test]
    fn test_shape_serde_tagged() {
        let json = r#"{"query_type":"attribution","models":["first_touch","last_touch"]}"#;
        let shape: QueryShape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.model_count(), 2);

        let web: QueryShape = serde_json::from_str(r#"{"query_type":"web"}"#).unwrap();
        assert_eq!(web, QueryShape::Web);

        let funnel: QueryShape = serde_json::from_str(r#"{"query_type":"funnel"}"#).unwrap();
        assert_eq!(funnel.breakdown_count(), 0);
    }
}
