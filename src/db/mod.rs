use std::{
    str,
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, DB};

use crate::model::{
    recipe::{NewSavedRecipe, SavedRecipe},
    user::User,
};

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{RecipeStore, StoreError, UserStore};

use store::{email_taken, new_record_id, now_millis};

pub struct DBLayer {
    db: DB,
    // Serializes the email uniqueness check with the user write.
    user_writes: Mutex<()>,
}

impl DBLayer {
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            user_writes: Mutex::new(()),
        })
    }

    // ============================================================
    // KEYS
    // ============================================================
    fn recipe_prefix(owner: &str) -> String {
        format!("recipe:{owner}:")
    }

    fn recipe_key(owner: &str, created_ts: i64, id: &str) -> String {
        // 020 → zero-padded timestamp so keys sort chronologically
        format!("{}{:020}:{id}", Self::recipe_prefix(owner), created_ts)
    }

    fn user_key(id: &str) -> String {
        format!("user:{id}")
    }

    fn user_email_key(email: &str) -> String {
        format!("user_email:{email}")
    }

    /// Every `(key, value)` under `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(Box<[u8]>, Box<[u8]>)>, StoreError> {
        let mut out = Vec::new();
        for item in self
            .db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward))
        {
            let (key, val) = item?;
            if !str::from_utf8(&key)?.starts_with(prefix) {
                break;
            }
            out.push((key, val));
        }
        Ok(out)
    }
}

// ============================================================
// RECIPE STORAGE (OWNER-ORDERED)
// ============================================================
#[async_trait]
impl RecipeStore for DBLayer {
    async fn insert(&self, recipe: NewSavedRecipe) -> Result<SavedRecipe, StoreError> {
        let saved = recipe.into_saved(new_record_id(), now_millis());
        let key = Self::recipe_key(&saved.user_id, saved.created_ts, &saved.id);
        self.db.put(key, serde_json::to_vec(&saved)?)?;
        Ok(saved)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<SavedRecipe>, StoreError> {
        let mut recipes = self
            .scan_prefix(&Self::recipe_prefix(owner))?
            .into_iter()
            .map(|(_, val)| serde_json::from_slice::<SavedRecipe>(&val))
            .collect::<Result<Vec<_>, _>>()?;
        recipes.reverse();
        Ok(recipes)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let suffix = format!(":{id}");
        for (key, _) in self.scan_prefix(&Self::recipe_prefix(owner))? {
            if str::from_utf8(&key)?.ends_with(&suffix) {
                self.db.delete(key)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

// ============================================================
// USER STORAGE
// ============================================================
#[async_trait]
impl UserStore for DBLayer {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let _guard = self
            .user_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let email_key = Self::user_email_key(&user.email);
        if self.db.get(&email_key)?.is_some() {
            return Err(email_taken(&user.email));
        }

        // Record first, then the email index that makes it discoverable.
        self.db
            .put(Self::user_key(&user.id), serde_json::to_vec(&user)?)?;
        self.db.put(email_key, user.id.as_bytes())?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.db.get(Self::user_email_key(email))? else {
            return Ok(None);
        };
        self.load_user(str::from_utf8(&id)?).await
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.db
            .get(Self::user_key(id))?
            .map(|val| serde_json::from_slice(&val))
            .transpose()
            .map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::recipe::{CookingTimePreference, Recipe};

    fn open() -> (tempfile::TempDir, DBLayer) {
        let dir = tempfile::tempdir().unwrap();
        let db = DBLayer::new(dir.path().to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn new_recipe(owner: &str, title: &str) -> NewSavedRecipe {
        NewSavedRecipe {
            user_id: owner.into(),
            prompt: title.to_lowercase(),
            cooking_type: CookingTimePreference::Normal,
            recipe: Recipe {
                title: title.into(),
                cooking_time: "20 minutes".into(),
                serving_size: "2 people".into(),
                ingredients: vec!["salt".into()],
                instructions: vec!["cook".into()],
                cooking_tips: "taste as you go".into(),
                cuisine_style: "Home".into(),
            },
        }
    }

    #[tokio::test]
    async fn recipes_are_listed_newest_first_per_owner() {
        let (_dir, db) = open();

        let first = db.insert(new_recipe("alice", "Soup")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = db.insert(new_recipe("alice", "Stew")).await.unwrap();
        db.insert(new_recipe("bob", "Salad")).await.unwrap();

        let listed = db.list_by_owner("alice").await.unwrap();
        assert_eq!(listed, vec![second, first]);
        assert!(listed.iter().all(|r| r.is_saved));
        assert!(db.list_by_owner("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn back_to_back_inserts_keep_creation_order() {
        let (_dir, db) = open();

        let mut ids = Vec::new();
        for n in 0..20 {
            let saved = db.insert(new_recipe("alice", &format!("Dish {n}"))).await.unwrap();
            ids.push(saved.id);
        }
        ids.reverse();

        let listed = db.list_by_owner("alice").await.unwrap();
        assert_eq!(listed.into_iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let (_dir, db) = open();
        let saved = db.insert(new_recipe("alice", "Soup")).await.unwrap();

        assert!(!db.delete("bob", &saved.id).await.unwrap());
        assert!(db.delete("alice", &saved.id).await.unwrap());
        assert!(!db.delete("alice", &saved.id).await.unwrap());
        assert!(db.list_by_owner("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn users_are_indexed_by_email_and_unique() {
        let (_dir, db) = open();
        let user = User::new("u1".into(), "a@b.com".into(), "hash".into());
        db.create_user(user.clone()).await.unwrap();

        let found = db.find_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert!(db.load_user("u1").await.unwrap().is_some());
        assert!(db.find_user_by_email("x@y.com").await.unwrap().is_none());

        let dup = User::new("u2".into(), "a@b.com".into(), "hash".into());
        assert!(matches!(
            db.create_user(dup).await,
            Err(StoreError::Conflict(_))
        ));
    }
}
