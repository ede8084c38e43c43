//! # CLI Commands
//!
//! Every subcommand receives the [`bebidas_db::Database`] handle explicitly
//! and returns `Result<T, ApiError>`.
//!
//! ## Available Commands
//!
//! | Subcommand | Function                    | Returns               |
//! |------------|-----------------------------|-----------------------|
//! | `today`    | [`drink::drink_of_the_day`] | `Option<DrinkDto>`    |
//! | `list`     | [`drink::list_drinks`]      | `DrinkList`           |
//! | `show`     | [`drink::get_drink`]        | `DrinkDto`            |
//! | `add`      | [`drink::add_drink`]        | `DrinkDto`            |
//! | `delete`   | [`drink::delete_drink`]     | `DeleteOutcome`       |

pub mod drink;

pub use drink::{DeleteOutcome, DrinkDto, DrinkList};
