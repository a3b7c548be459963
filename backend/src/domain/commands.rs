//! Domain-level command types.
//!
//! These are what services accept. The REST layer maps the public DTOs from the
//! `shared` crate onto them; raw strings are kept where the service owns the
//! validation (dates, gender, statuses).

pub mod birds {
    #[derive(Debug, Clone, Default)]
    pub struct CreateBirdCommand {
        pub identifier: String,
        pub species: String,
        pub gender: Option<String>,
        pub birth_date: String,
        pub status: Option<String>,
        pub ring: Option<String>,
        pub details: Option<String>,
        pub mother_id: Option<String>,
        pub father_id: Option<String>,
    }

    /// Absent fields are left untouched. For the optional text and parent
    /// fields an empty string clears the stored value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateBirdCommand {
        pub identifier: Option<String>,
        pub species: Option<String>,
        pub gender: Option<String>,
        pub birth_date: Option<String>,
        pub status: Option<String>,
        pub ring: Option<String>,
        pub details: Option<String>,
        pub mother_id: Option<String>,
        pub father_id: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct BuyerInfoInput {
        pub national_id: Option<String>,
        pub full_name: Option<String>,
        pub phone: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct SellBirdCommand {
        pub price: f64,
        pub buyer_info: Option<BuyerInfoInput>,
    }

    /// Descriptive fields the buyer may set while taking custody
    #[derive(Debug, Clone, Default)]
    pub struct PurchaseBirdCommand {
        pub status: Option<String>,
        pub ring: Option<String>,
        pub details: Option<String>,
    }
}

pub mod cages {
    #[derive(Debug, Clone)]
    pub struct CreateCageCommand {
        pub cage_number: String,
        pub male_id: String,
        pub female_id: String,
        pub species: String,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateCageCommand {
        pub cage_number: Option<String>,
        pub male_id: Option<String>,
        pub female_id: Option<String>,
        pub species: Option<String>,
        pub status: Option<String>,
        pub notes: Option<String>,
    }
}

pub mod nests {
    #[derive(Debug, Clone, Default)]
    pub struct CreateNestCommand {
        pub cage_number: String,
        pub number_of_eggs: i64,
        pub fertilized_eggs: i64,
        pub extracted_eggs: i64,
        pub birds_exited: Option<i64>,
        pub exclusion_date: String,
        pub first_bird_exit_date: Option<String>,
        pub status: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateNestCommand {
        pub cage_number: Option<String>,
        pub number_of_eggs: Option<i64>,
        pub fertilized_eggs: Option<i64>,
        pub extracted_eggs: Option<i64>,
        pub birds_exited: Option<i64>,
        pub exclusion_date: Option<String>,
        pub first_bird_exit_date: Option<String>,
        pub status: Option<String>,
        pub notes: Option<String>,
    }
}

pub mod pairs {
    #[derive(Debug, Clone)]
    pub struct ProposePairCommand {
        pub male_id: String,
        pub female_id: String,
        pub species: Option<String>,
        pub notes: Option<String>,
    }
}

pub mod users {
    #[derive(Debug, Clone)]
    pub struct RegisterUserCommand {
        pub national_id: String,
        pub full_name: String,
        pub email: String,
    }

    #[derive(Debug, Clone)]
    pub struct RegisteredUser {
        pub user: crate::domain::models::user::User,
        pub token: String,
    }
}
