use std::collections::HashMap;

use log::info;

use agenda_shared::models::Person;

use crate::api::ApiClient;
use crate::error::Result;

/// In-memory catalog of people available for assignment.
///
/// Reloads are atomic: the replacement list and index are fully built
/// before they are swapped in, so readers never observe a half-updated
/// cache. A failed reload leaves the previous contents in place
/// (stale-but-valid) and surfaces the error to the caller.
#[derive(Default)]
pub struct CatalogCache {
    people: Vec<Person>,
    index: HashMap<i64, Person>,
}

impl CatalogCache {
    /// Fetches the full person list and replaces the cache.
    pub async fn reload(&mut self, client: &ApiClient) -> Result<()> {
        let people = client.catalog().await?;
        let index: HashMap<i64, Person> = people.iter().map(|p| (p.id, p.clone())).collect();
        info!("catalog reloaded with {} people", people.len());
        self.people = people;
        self.index = index;
        Ok(())
    }

    pub fn lookup(&self, id: i64) -> Option<&Person> {
        self.index.get(&id)
    }

    /// Ordered list, for rebuilding any selection control bound to the
    /// catalog.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
