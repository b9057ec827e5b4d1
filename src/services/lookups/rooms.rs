use crate::admin::resources::room;
use crate::admin::{DescriptorContext, FormInput, ListQuery, ResourceDescriptor};
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::auth::entities::AuthContext;
use crate::models::lookups::entities::Room;
use crate::models::lookups::requests::RoomInput;
use crate::services::panel::PanelResource;
use crate::storage::Storage;

#[derive(Default)]
pub struct RoomService;

fn room_input(input: &FormInput) -> Result<RoomInput> {
    Ok(RoomInput {
        campus_id: input.required_i64("campus_id")?,
        name: input.required_text("name")?,
        capacity: input.i32("capacity")?,
    })
}

#[async_trait::async_trait]
impl PanelResource for RoomService {
    type Row = Room;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<Room> {
        room::descriptor(ctx)
    }

    async fn list(&self, storage: &dyn Storage, query: &ListQuery) -> Result<PaginatedResponse<Room>> {
        storage.list_rooms(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<Room>> {
        storage.get_room(id).await
    }

    async fn create(
        &self,
        storage: &dyn Storage,
        input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<Room> {
        storage.create_room(room_input(input)?).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<Room>> {
        storage.update_room(id, room_input(input)?).await
    }

    async fn delete(&self, storage: &dyn Storage, id: i64, auth: &AuthContext) -> Result<bool> {
        storage.delete_room(id, auth.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_room_input_from_form() {
        let form = FormInput::from_form(HashMap::from([
            ("campus_id".to_string(), "3".to_string()),
            ("name".to_string(), "Salle B".to_string()),
            ("capacity".to_string(), "".to_string()),
        ]));
        let input = room_input(&form).unwrap();
        assert_eq!(input.campus_id, 3);
        assert_eq!(input.name, "Salle B");
        assert_eq!(input.capacity, None);
    }
}
