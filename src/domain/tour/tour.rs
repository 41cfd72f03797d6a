use super::value_objects::{Difficulty, Location};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Ratings shown for a tour nobody has reviewed yet
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

/// Input for creating a tour
#[derive(Debug, Clone)]
pub struct NewTour {
    pub name: String,
    pub duration_days: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub price: Decimal,
    pub price_discount: Option<Decimal>,
    pub summary: String,
    pub description: String,
    pub locations: Vec<Location>,
}

/// Partial update applied to an existing tour
///
/// `None` fields are left untouched. Setting a new name also re-derives
/// the slug.
#[derive(Debug, Clone, Default)]
pub struct TourChanges {
    pub name: Option<String>,
    pub duration_days: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<Decimal>,
    pub price_discount: Option<Option<Decimal>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub locations: Option<Vec<Location>>,
}

/// Tour aggregate root
///
/// # Invariants
/// - Name and summary cannot be empty
/// - Duration and group size are at least 1
/// - Price is positive; a discount must be lower than the price
/// - Ratings average stays within 1.0..=5.0
#[derive(Debug, Clone)]
pub struct Tour {
    id: Uuid,
    name: String,
    slug: String,
    duration_days: i32,
    max_group_size: i32,
    difficulty: Difficulty,
    price: Decimal,
    price_discount: Option<Decimal>,
    summary: String,
    description: String,
    ratings_average: f64,
    ratings_quantity: i32,
    locations: Vec<Location>,
    created_at: DateTime<Utc>,
}

impl Tour {
    /// Creates a new Tour, enforcing all business rules
    ///
    /// New tours start with the default ratings (no reviews yet) and a slug
    /// derived from the name.
    pub fn new(input: NewTour) -> Result<Self, String> {
        validate(
            &input.name,
            input.duration_days,
            input.max_group_size,
            input.price,
            input.price_discount,
            &input.summary,
        )?;

        let slug = slugify(&input.name);

        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name,
            slug,
            duration_days: input.duration_days,
            max_group_size: input.max_group_size,
            difficulty: input.difficulty,
            price: input.price,
            price_discount: input.price_discount,
            summary: input.summary,
            description: input.description,
            ratings_average: DEFAULT_RATINGS_AVERAGE,
            ratings_quantity: 0,
            locations: input.locations,
            created_at: Utc::now(),
        })
    }

    /// Applies a partial update, re-validating the result
    pub fn apply(&mut self, changes: TourChanges) -> Result<(), String> {
        let name = changes.name.unwrap_or_else(|| self.name.clone());
        let duration_days = changes.duration_days.unwrap_or(self.duration_days);
        let max_group_size = changes.max_group_size.unwrap_or(self.max_group_size);
        let price = changes.price.unwrap_or(self.price);
        let price_discount = changes.price_discount.unwrap_or(self.price_discount);
        let summary = changes.summary.unwrap_or_else(|| self.summary.clone());

        validate(
            &name,
            duration_days,
            max_group_size,
            price,
            price_discount,
            &summary,
        )?;

        self.slug = slugify(&name);
        self.name = name;
        self.duration_days = duration_days;
        self.max_group_size = max_group_size;
        self.price = price;
        self.price_discount = price_discount;
        self.summary = summary;
        if let Some(difficulty) = changes.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(locations) = changes.locations {
            self.locations = locations;
        }

        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn duration_days(&self) -> i32 {
        self.duration_days
    }

    pub fn max_group_size(&self) -> i32 {
        self.max_group_size
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn price_discount(&self) -> Option<Decimal> {
        self.price_discount
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn ratings_average(&self) -> f64 {
        self.ratings_average
    }

    pub fn ratings_quantity(&self) -> i32 {
        self.ratings_quantity
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Tour from persistence layer data
    ///
    /// Bypasses business rule validation; only repository implementations
    /// should call this.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        slug: String,
        duration_days: i32,
        max_group_size: i32,
        difficulty: Difficulty,
        price: Decimal,
        price_discount: Option<Decimal>,
        summary: String,
        description: String,
        ratings_average: f64,
        ratings_quantity: i32,
        locations: Vec<Location>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            duration_days,
            max_group_size,
            difficulty,
            price,
            price_discount,
            summary,
            description,
            ratings_average,
            ratings_quantity,
            locations,
            created_at,
        }
    }
}

fn validate(
    name: &str,
    duration_days: i32,
    max_group_size: i32,
    price: Decimal,
    price_discount: Option<Decimal>,
    summary: &str,
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Tour name cannot be empty".to_string());
    }
    if summary.trim().is_empty() {
        return Err("Tour summary cannot be empty".to_string());
    }
    if duration_days < 1 {
        return Err("Tour duration must be at least one day".to_string());
    }
    if max_group_size < 1 {
        return Err("Group size must be at least 1".to_string());
    }
    if price <= Decimal::ZERO {
        return Err("Price must be positive".to_string());
    }
    if let Some(discount) = price_discount {
        if discount <= Decimal::ZERO || discount >= price {
            return Err("Discount price must be below the regular price".to_string());
        }
    }
    Ok(())
}

/// Derives a URL slug from a tour name
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewTour {
        NewTour {
            name: "The Forest Hiker".to_string(),
            duration_days: 5,
            max_group_size: 25,
            difficulty: Difficulty::Easy,
            price: Decimal::from(397),
            price_discount: None,
            summary: "Breathtaking hike through the Canadian Banff National Park".to_string(),
            description: String::new(),
            locations: vec![],
        }
    }

    #[test]
    fn create_tour_with_valid_input() {
        let tour = Tour::new(valid_input()).expect("valid tour");

        assert_eq!(tour.name(), "The Forest Hiker");
        assert_eq!(tour.slug(), "the-forest-hiker");
        assert_eq!(tour.ratings_average(), DEFAULT_RATINGS_AVERAGE);
        assert_eq!(tour.ratings_quantity(), 0);
    }

    #[test]
    fn create_tour_with_empty_name_fails() {
        let mut input = valid_input();
        input.name = "  ".to_string();

        let result = Tour::new(input);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("name"));
    }

    #[test]
    fn create_tour_with_zero_price_fails() {
        let mut input = valid_input();
        input.price = Decimal::ZERO;

        assert!(Tour::new(input).is_err());
    }

    #[test]
    fn create_tour_with_zero_duration_fails() {
        let mut input = valid_input();
        input.duration_days = 0;

        assert!(Tour::new(input).is_err());
    }

    #[test]
    fn discount_must_be_below_price() {
        let mut input = valid_input();
        input.price_discount = Some(Decimal::from(397));
        assert!(Tour::new(input).is_err());

        let mut input = valid_input();
        input.price_discount = Some(Decimal::from(400));
        assert!(Tour::new(input).is_err());

        let mut input = valid_input();
        input.price_discount = Some(Decimal::from(299));
        assert!(Tour::new(input).is_ok());
    }

    #[test]
    fn apply_renames_and_reslugs() {
        let mut tour = Tour::new(valid_input()).unwrap();

        let changes = TourChanges {
            name: Some("The Sea Explorer!".to_string()),
            ..Default::default()
        };
        tour.apply(changes).expect("valid update");

        assert_eq!(tour.name(), "The Sea Explorer!");
        assert_eq!(tour.slug(), "the-sea-explorer");
    }

    #[test]
    fn apply_rejects_invalid_discount() {
        let mut tour = Tour::new(valid_input()).unwrap();

        let changes = TourChanges {
            price_discount: Some(Some(Decimal::from(500))),
            ..Default::default()
        };
        assert!(tour.apply(changes).is_err());
        // The failed update must not have modified the tour
        assert_eq!(tour.price_discount(), None);
    }

    #[test]
    fn apply_clears_discount() {
        let mut input = valid_input();
        input.price_discount = Some(Decimal::from(299));
        let mut tour = Tour::new(input).unwrap();

        let changes = TourChanges {
            price_discount: Some(None),
            ..Default::default()
        };
        tour.apply(changes).expect("valid update");
        assert_eq!(tour.price_discount(), None);
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("The Forest Hiker"), "the-forest-hiker");
        assert_eq!(slugify("  The   Sea -- Explorer! "), "the-sea-explorer");
        assert_eq!(slugify("Café & Çity Break"), "caf-ity-break");
    }
}
