use crate::models::{ApiError, NewPet, Pet, Status};

pub async fn serve() {}

/// @Summary List pets
/// @Tags dogs, cats
/// @Param status query models::Status false "Filter by status"
/// @Param limit query u32 false
/// @Success 200 {array} models::Pet "All pets"
/// @Router /pets [get]
pub async fn list_pets() -> Vec<Pet> {
    Vec::new()
}

/// @Summary Add a pet
/// @Tags dogs
/// @Param pet body models.NewPet true "Pet to add"
/// @Success 201 {object} models::Pet
/// @Failure 400 {object} models::ApiError "Invalid input"
/// @Router /pets [post]
pub async fn create_pet(pet: NewPet) -> Result<Pet, ApiError> {
    unimplemented!()
}

pub struct PetApi;

impl PetApi {
    /// Looks a pet up by its id.
    ///
    /// @Summary Find pet by id
    /// @ID getPetById
    /// @Param id path Uuid true "Pet id"
    /// @Success 200 {object} models::Pet
    /// @Failure 404
    /// @Router /pets/:id [get]
    pub async fn get_pet(&self) -> Option<Pet> {
        None
    }

    /// @Summary Delete a pet
    /// @Deprecated
    /// @Param id path Uuid true
    /// @Param X-Api-Key header String true
    /// @Success 204
    /// @Router /pets/{id} [delete]
    pub async fn delete_pet(&self) {}
}

/// @Summary Count pets by status
/// @Success 200 {object} HashMap<String, u64>
/// @Router /pets/counts [get]
pub async fn count_pets() -> std::collections::HashMap<Status, u64> {
    Default::default()
}
