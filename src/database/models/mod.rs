pub mod drink;

pub use drink::{Drink, DrinkLong, DrinkShort, RecipePart};
