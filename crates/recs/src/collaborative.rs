//! Neighbor-based collaborative filtering.
//!
//! Rebuilds the user-item matrix per request, ranks other users by cosine
//! similarity, and aggregates neighbor affinities into candidate scores.
//! Falls back to the trending recommender whenever the target user has no
//! vector or no sufficiently similar neighbor exists.

use crate::cold_start::TrendingRecommender;
use crate::matrix::{UserItemMatrixBuilder, UserVector};
use crate::RecsConfig;
use commerce_insight_core::{sparse_cosine_similarity, InteractionStore, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// User-user collaborative recommender with cold-start fallback
pub struct CollaborativeRecommender {
    matrix_builder: UserItemMatrixBuilder,
    trending: TrendingRecommender,
    config: RecsConfig,
}

impl CollaborativeRecommender {
    pub fn new(interactions: Arc<dyn InteractionStore>, config: RecsConfig) -> Self {
        Self {
            matrix_builder: UserItemMatrixBuilder::new(
                Arc::clone(&interactions),
                config.matrix_lookback_days,
            ),
            trending: TrendingRecommender::new(interactions, config.trending_lookback_days),
            config,
        }
    }

    /// Recommend up to `limit` products for `user_id`, never returning
    /// products the user already interacted with or ids in `exclude`.
    pub async fn recommend(
        &self,
        user_id: Uuid,
        limit: usize,
        exclude: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        let matrix = self.matrix_builder.build().await?;

        let Some(target_vector) = matrix.get(&user_id) else {
            debug!(%user_id, "User not in matrix, falling back to trending");
            return self.trending.recommend(limit, exclude).await;
        };

        let neighbors = self.top_neighbors(user_id, target_vector, &matrix);
        if neighbors.is_empty() {
            debug!(%user_id, "No similar users found, falling back to trending");
            return self.trending.recommend(limit, exclude).await;
        }

        let mut candidate_scores: HashMap<Uuid, f64> = HashMap::new();
        for (neighbor_id, similarity) in &neighbors {
            let neighbor_vector = &matrix[neighbor_id];
            for (&product_id, &score) in neighbor_vector {
                // Skip products the target already touched
                if target_vector.contains_key(&product_id) {
                    continue;
                }
                if exclude.contains(&product_id) {
                    continue;
                }
                *candidate_scores.entry(product_id).or_insert(0.0) += score * similarity;
            }
        }

        let mut ranked: Vec<(Uuid, f64)> = candidate_scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(limit);

        info!(
            %user_id,
            neighbors = neighbors.len(),
            recommendations = ranked.len(),
            "Generated collaborative recommendations"
        );
        Ok(ranked.into_iter().map(|(id, _)| id).collect())
    }

    /// Similarity to every other known user, thresholded and capped at the
    /// configured neighbor count.
    fn top_neighbors(
        &self,
        user_id: Uuid,
        target_vector: &UserVector,
        matrix: &HashMap<Uuid, UserVector>,
    ) -> Vec<(Uuid, f64)> {
        let mut similarities: Vec<(Uuid, f64)> = matrix
            .iter()
            .filter(|(other_id, _)| **other_id != user_id)
            .filter_map(|(other_id, other_vector)| {
                let similarity = sparse_cosine_similarity(target_vector, other_vector);
                (similarity > self.config.similarity_threshold).then_some((*other_id, similarity))
            })
            .collect();

        similarities.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        similarities.truncate(self.config.neighbor_count);
        similarities
    }
}
