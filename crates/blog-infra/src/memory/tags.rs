use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{Tag, TagDelta};
use blog_core::error::RepoError;
use blog_core::ports::TagFrequencyIndex;

#[derive(Default)]
struct TagTable {
    rows: HashMap<String, Tag>,
    last_id: i32,
}

/// In-memory tag frequency index.
#[derive(Default)]
pub struct InMemoryTagIndex {
    table: RwLock<TagTable>,
}

impl InMemoryTagIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagFrequencyIndex for InMemoryTagIndex {
    async fn update_frequency(&self, old_tags: &str, new_tags: &str) -> Result<(), RepoError> {
        let delta = TagDelta::between(old_tags, new_tags);
        if delta.is_empty() {
            return Ok(());
        }

        let mut table = self.table.write().await;
        for name in delta.added {
            if let Some(tag) = table.rows.get_mut(&name) {
                tag.frequency += 1;
            } else {
                table.last_id += 1;
                let id = table.last_id;
                table.rows.insert(
                    name.clone(),
                    Tag {
                        id,
                        name,
                        frequency: 1,
                    },
                );
            }
        }
        for name in delta.removed {
            if let Some(tag) = table.rows.get_mut(&name) {
                tag.frequency -= 1;
            }
        }
        table.rows.retain(|_, tag| tag.frequency > 0);

        Ok(())
    }

    async fn frequency(&self, name: &str) -> Result<Option<i32>, RepoError> {
        Ok(self.table.read().await.rows.get(name).map(|t| t.frequency))
    }

    async fn popular(&self, limit: u64) -> Result<Vec<Tag>, RepoError> {
        let table = self.table.read().await;
        let mut tags: Vec<Tag> = table.rows.values().cloned().collect();
        tags.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.name.cmp(&b.name)));
        tags.truncate(limit as usize);
        Ok(tags)
    }
}
