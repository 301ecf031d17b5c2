//! In-memory Gateway backend
//!
//! DashMap-backed record store. Mutations happen inside the map's
//! entry lock, which gives exactly the guarantee the contract promises:
//! per-record atomic read-modify-write, no multi-record transactions.
//!
//! Serves as the default backend of the server and as the substitute
//! store for every test.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::models::{
    Category, FidelityCard, FidelityCardCreate, FidelityCardPatch, Guest, GuestCreate, Ingredient,
    Order, OrderCreate, OrderPatch, OrderState, PartialOrder, PartialOrderCreate,
    PartialOrderState, Product, ProductCreate, Table,
};
use uuid::Uuid;

use super::gateway::{
    CategoryStore, DbError, DbResult, FidelityCardStore, GuestStore, IngredientStore, OrderStore,
    PartialOrderStore, ProductStore, TableStore, is_queued,
};

/// DashMap-backed record store
#[derive(Debug, Default)]
pub struct MemoryGateway {
    orders: DashMap<String, Order>,
    partial_orders: DashMap<String, PartialOrder>,
    tables: DashMap<String, Table>,
    products: DashMap<String, Product>,
    categories: DashMap<String, Category>,
    ingredients: DashMap<String, Ingredient>,
    guests: DashMap<String, Guest>,
    fidelity_cards: DashMap<String, FidelityCard>,
    /// Order IDs whose writes fail on purpose (cascade failure tests)
    #[cfg(test)]
    fail_order_writes: dashmap::DashSet<String>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Seeding (records owned by external collaborators) ==========

    pub fn insert_table(&self, table: Table) {
        self.tables.insert(table.id.clone(), table);
    }

    pub fn insert_product(&self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn insert_ingredient(&self, ingredient: Ingredient) {
        self.ingredients.insert(ingredient.id.clone(), ingredient);
    }

    /// Make every subsequent write to this order fail
    #[cfg(test)]
    pub fn fail_order_writes_for(&self, order_id: &str) {
        self.fail_order_writes.insert(order_id.to_string());
    }

    #[cfg(test)]
    fn check_injected_failure(&self, order_id: &str) -> DbResult<()> {
        if self.fail_order_writes.contains(order_id) {
            return Err(DbError::Database(format!(
                "injected write failure for {}",
                order_id
            )));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check_injected_failure(&self, _order_id: &str) -> DbResult<()> {
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryGateway {
    async fn create_order(&self, data: OrderCreate) -> DbResult<Order> {
        let order = Order {
            id: new_id(),
            table_id: data.table_id,
            state: data.state,
            created_at: data.created_at,
            all_courses_together: data.all_courses_together,
            preparation_time: 0,
            time_to_service: 0,
        };
        self.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn order_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        Ok(self.orders.get(id).map(|o| o.clone()))
    }

    async fn update_order(&self, id: &str, patch: OrderPatch) -> DbResult<Order> {
        self.check_injected_failure(id)?;
        let mut entry = self
            .orders
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("Order {} not found", id)))?;
        if let Some(state) = patch.state {
            entry.state = state;
        }
        if let Some(created_at) = patch.created_at {
            entry.created_at = created_at;
        }
        if let Some(act) = patch.all_courses_together {
            entry.all_courses_together = act;
        }
        if let Some(prep) = patch.preparation_time {
            entry.preparation_time = prep;
        }
        if let Some(tts) = patch.time_to_service {
            entry.time_to_service = tts;
        }
        Ok(entry.clone())
    }

    async fn open_order_for_table(&self, table_id: &str) -> DbResult<Option<Order>> {
        let mut open: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.table_id == table_id && o.state == OrderState::New)
            .map(|o| o.clone())
            .collect();
        open.sort_by_key(|o| o.created_at);
        Ok(open.into_iter().next())
    }

    async fn orders_for_table(&self, table_id: &str, since: Option<i64>) -> DbResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.table_id == table_id)
            .filter(|o| since.is_none_or(|ts| o.created_at > ts))
            .map(|o| o.clone())
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn latest_confirmed_before(&self, ts: i64) -> DbResult<Option<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.state != OrderState::New && o.created_at < ts)
            .max_by_key(|o| o.created_at)
            .map(|o| o.clone()))
    }

    async fn queued_after(&self, ts: i64) -> DbResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.created_at > ts && is_queued(o.state))
            .map(|o| o.clone())
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn adjust_time_to_service(&self, id: &str, delta: i64) -> DbResult<Order> {
        self.check_injected_failure(id)?;
        let mut entry = self
            .orders
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("Order {} not found", id)))?;
        // The order may have left the queue since it was listed
        if is_queued(entry.state) {
            entry.time_to_service = (entry.time_to_service + delta).max(0);
        }
        Ok(entry.clone())
    }

    async fn count_unpaid_for_table(&self, table_id: &str) -> DbResult<u64> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.table_id == table_id && o.state != OrderState::Paid)
            .count() as u64)
    }
}

#[async_trait]
impl PartialOrderStore for MemoryGateway {
    async fn create_partial_order(&self, data: PartialOrderCreate) -> DbResult<PartialOrder> {
        let partial = PartialOrder {
            id: new_id(),
            order_id: data.order_id,
            product_id: data.product_id,
            participant: data.participant,
            state: PartialOrderState::Pending,
            created_at: data.created_at,
        };
        self.partial_orders
            .insert(partial.id.clone(), partial.clone());
        Ok(partial)
    }

    async fn partial_orders_for_order(&self, order_id: &str) -> DbResult<Vec<PartialOrder>> {
        let mut partials: Vec<PartialOrder> = self
            .partial_orders
            .iter()
            .filter(|p| p.order_id == order_id)
            .map(|p| p.clone())
            .collect();
        partials.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(partials)
    }

    async fn count_partial_orders(&self, order_id: &str) -> DbResult<u64> {
        Ok(self
            .partial_orders
            .iter()
            .filter(|p| p.order_id == order_id)
            .count() as u64)
    }

    async fn update_partial_order_state(
        &self,
        id: &str,
        state: PartialOrderState,
    ) -> DbResult<PartialOrder> {
        let mut entry = self
            .partial_orders
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("PartialOrder {} not found", id)))?;
        entry.state = state;
        Ok(entry.clone())
    }

    async fn delete_partial_order(&self, id: &str) -> DbResult<bool> {
        Ok(self.partial_orders.remove(id).is_some())
    }
}

#[async_trait]
impl TableStore for MemoryGateway {
    async fn table_by_id(&self, id: &str) -> DbResult<Option<Table>> {
        Ok(self.tables.get(id).map(|t| t.clone()))
    }

    async fn table_by_number(&self, number: i32) -> DbResult<Option<Table>> {
        Ok(self
            .tables
            .iter()
            .find(|t| t.number == number)
            .map(|t| t.clone()))
    }

    async fn table_by_access_code(&self, access_code: &str) -> DbResult<Option<Table>> {
        Ok(self
            .tables
            .iter()
            .find(|t| t.access_code == access_code)
            .map(|t| t.clone()))
    }

    async fn set_check_request(&self, id: &str) -> DbResult<Table> {
        let mut entry = self
            .tables
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("Table {} not found", id)))?;
        entry.check_request = true;
        Ok(entry.clone())
    }
}

#[async_trait]
impl ProductStore for MemoryGateway {
    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self.products.get(id).map(|p| p.clone()))
    }

    async fn products_by_ids(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.products.get(id).map(|p| p.clone()))
            .collect())
    }

    async fn create_product(&self, data: ProductCreate) -> DbResult<Product> {
        let product = Product {
            id: new_id(),
            name: data.name,
            category_id: data.category_id,
            time_to_prepare: data.time_to_prepare,
            price: data.price,
            available: data.available,
        };
        self.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }
}

#[async_trait]
impl CategoryStore for MemoryGateway {
    async fn category_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        Ok(self.categories.get(id).map(|c| c.clone()))
    }
}

#[async_trait]
impl IngredientStore for MemoryGateway {
    async fn ingredient_by_id(&self, id: &str) -> DbResult<Option<Ingredient>> {
        Ok(self.ingredients.get(id).map(|i| i.clone()))
    }

    async fn ingredients_by_ids(&self, ids: &[String]) -> DbResult<Vec<Ingredient>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.ingredients.get(id).map(|i| i.clone()))
            .collect())
    }
}

#[async_trait]
impl GuestStore for MemoryGateway {
    async fn guest_by_session(&self, session_code: &str) -> DbResult<Option<Guest>> {
        Ok(self
            .guests
            .iter()
            .find(|g| g.session_code == session_code)
            .map(|g| g.clone()))
    }

    async fn create_guest(&self, data: GuestCreate) -> DbResult<Guest> {
        let guest = Guest {
            id: new_id(),
            session_code: data.session_code,
            created_at: data.created_at,
        };
        self.guests.insert(guest.id.clone(), guest.clone());
        Ok(guest)
    }
}

#[async_trait]
impl FidelityCardStore for MemoryGateway {
    async fn card_by_user(&self, user_id: &str) -> DbResult<Option<FidelityCard>> {
        Ok(self
            .fidelity_cards
            .iter()
            .find(|c| c.user_id == user_id)
            .map(|c| c.clone()))
    }

    async fn create_card(&self, data: FidelityCardCreate) -> DbResult<FidelityCard> {
        let card = FidelityCard {
            id: new_id(),
            user_id: data.user_id,
            points: data.points,
            use_points: data.use_points,
        };
        self.fidelity_cards.insert(card.id.clone(), card.clone());
        Ok(card)
    }

    async fn update_card(&self, id: &str, patch: FidelityCardPatch) -> DbResult<FidelityCard> {
        let mut entry = self
            .fidelity_cards
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("FidelityCard {} not found", id)))?;
        if let Some(points) = patch.points {
            entry.points = points;
        }
        if let Some(use_points) = patch.use_points {
            entry.use_points = use_points;
        }
        Ok(entry.clone())
    }
}
