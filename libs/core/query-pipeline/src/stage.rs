//! Typed aggregation stages and their MongoDB rendering.

use mongodb::bson::{doc, Document};

/// One stage of a compiled pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    Search(Document),
    Match(Document),
    Sort(Document),
    Project(Document),
    Facet { skip: u64, limit: u64 },
    Unwind { path: String, preserve_empty: bool },
}

impl PipelineStage {
    /// Stage operator name, as it appears in the rendered document.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Search(_) => "$search",
            PipelineStage::Match(_) => "$match",
            PipelineStage::Sort(_) => "$sort",
            PipelineStage::Project(_) => "$project",
            PipelineStage::Facet { .. } => "$facet",
            PipelineStage::Unwind { .. } => "$unwind",
        }
    }

    /// Position in the fixed stage order. `$search` must come first for
    /// Atlas Search to accept the pipeline.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            PipelineStage::Search(_) => 0,
            PipelineStage::Match(_) => 1,
            PipelineStage::Sort(_) => 2,
            PipelineStage::Project(_) => 3,
            PipelineStage::Facet { .. } => 4,
            PipelineStage::Unwind { .. } => 5,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            PipelineStage::Search(body)
            | PipelineStage::Match(body)
            | PipelineStage::Sort(body)
            | PipelineStage::Project(body) => {
                let mut stage = Document::new();
                stage.insert(self.name(), body.clone());
                stage
            }
            PipelineStage::Facet { skip, limit } => doc! {
                "$facet": {
                    "metadata": [{ "$count": "totalResults" }],
                    "data": [
                        { "$skip": to_i64(*skip) },
                        { "$limit": to_i64(*limit) },
                    ],
                }
            },
            PipelineStage::Unwind {
                path,
                preserve_empty,
            } => doc! {
                "$unwind": {
                    "path": path.as_str(),
                    "preserveNullAndEmptyArrays": *preserve_empty,
                }
            },
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_stages_wrap_body() {
        let stage = PipelineStage::Match(doc! { "status": "public" });
        assert_eq!(stage.to_document(), doc! { "$match": { "status": "public" } });

        let stage = PipelineStage::Sort(doc! { "createdAt": -1 });
        assert_eq!(stage.to_document(), doc! { "$sort": { "createdAt": -1 } });
    }

    #[test]
    fn test_facet_renders_count_and_page() {
        let stage = PipelineStage::Facet { skip: 10, limit: 10 };
        assert_eq!(
            stage.to_document(),
            doc! {
                "$facet": {
                    "metadata": [{ "$count": "totalResults" }],
                    "data": [{ "$skip": 10_i64 }, { "$limit": 10_i64 }],
                }
            }
        );
    }

    #[test]
    fn test_unwind_keeps_empty_metadata() {
        let stage = PipelineStage::Unwind {
            path: "$metadata".into(),
            preserve_empty: true,
        };
        assert_eq!(
            stage.to_document(),
            doc! { "$unwind": { "path": "$metadata", "preserveNullAndEmptyArrays": true } }
        );
    }

    #[test]
    fn test_rank_follows_stage_order() {
        let stages = [
            PipelineStage::Search(Document::new()),
            PipelineStage::Match(Document::new()),
            PipelineStage::Sort(Document::new()),
            PipelineStage::Project(Document::new()),
            PipelineStage::Facet { skip: 0, limit: 1 },
            PipelineStage::Unwind {
                path: "$metadata".into(),
                preserve_empty: true,
            },
        ];
        assert!(stages.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }
}
