use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{email_taken, new_record_id, now_millis, RecipeStore, StoreError, UserStore};
use crate::model::{
    recipe::{NewSavedRecipe, SavedRecipe},
    user::User,
};

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<Vec<SavedRecipe>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn insert(&self, recipe: NewSavedRecipe) -> Result<SavedRecipe, StoreError> {
        let saved = recipe.into_saved(new_record_id(), now_millis());
        self.recipes.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<SavedRecipe>, StoreError> {
        // Kept in insertion order, so reversing gives newest first.
        let recipes = self.recipes.read().await;
        Ok(recipes
            .iter()
            .rev()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect())
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let mut recipes = self.recipes.write().await;
        let before = recipes.len();
        recipes.retain(|r| !(r.user_id == owner && r.id == id));
        Ok(recipes.len() != before)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(email_taken(&user.email));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::recipe::{CookingTimePreference, Recipe};

    fn new_recipe(owner: &str, title: &str) -> NewSavedRecipe {
        NewSavedRecipe {
            user_id: owner.into(),
            prompt: title.into(),
            cooking_type: CookingTimePreference::Long,
            recipe: Recipe {
                title: title.into(),
                cooking_time: "2 hours".into(),
                serving_size: "6 people".into(),
                ingredients: vec!["beef".into()],
                instructions: vec!["braise".into()],
                cooking_tips: "low and slow".into(),
                cuisine_style: "French".into(),
            },
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_and_delete_is_owner_scoped() {
        let store = MemoryStore::new();
        let a = store.insert(new_recipe("alice", "Daube")).await.unwrap();
        let b = store.insert(new_recipe("alice", "Bourguignon")).await.unwrap();
        store.insert(new_recipe("bob", "Cassoulet")).await.unwrap();

        let listed = store.list_by_owner("alice").await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec![b.id.as_str(), a.id.as_str()]
        );

        assert!(!store.delete("bob", &a.id).await.unwrap());
        assert!(store.delete("alice", &a.id).await.unwrap());
        assert_eq!(store.list_by_owner("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        store
            .create_user(User::new("u1".into(), "a@b.com".into(), "h".into()))
            .await
            .unwrap();
        let err = store
            .create_user(User::new("u2".into(), "a@b.com".into(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
