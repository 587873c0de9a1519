use std::sync::Arc;

use chrono::{Duration, Utc};
use mobigo::agreements::models::{Agreement, CreateAgreementRequest, PaymentType};
use mobigo::agreements::{AgreementService, PaymentCreator};
use mobigo::bookings::{Booking, BookingService};
use mobigo::middleware::auth::{AuthenticatedUser, TokenSigner, ROLE_CUSTOMER, ROLE_STAFF};
use mobigo::payments::PaymentService;
use mobigo::users::models::RegisterUserRequest;
use mobigo::users::UserService;
use mobigo::vehicles::models::CreateVehicleRequest;
use mobigo::vehicles::{Vehicle, VehicleService, VehicleStatus};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use uuid::Uuid;

pub const TEST_TOKEN_SECRET: &str = "integration-test-secret-with-enough-length";
pub const TEST_GATEWAY_URL: &str = "https://app.sandbox.midtrans.com";

/// Services wired the way `main` wires them
pub struct TestServices {
    pub pool: MySqlPool,
    pub users: UserService,
    pub vehicles: VehicleService,
    pub bookings: BookingService,
    pub payments: Arc<PaymentService>,
    pub agreements: AgreementService,
}

impl TestServices {
    pub fn new(pool: MySqlPool) -> Self {
        let payments = Arc::new(PaymentService::new(pool.clone(), TEST_GATEWAY_URL));
        let creator: Arc<dyn PaymentCreator> = payments.clone();

        Self {
            users: UserService::new(pool.clone(), Arc::new(TokenSigner::new(TEST_TOKEN_SECRET, 1))),
            vehicles: VehicleService::new(pool.clone()),
            bookings: BookingService::new(pool.clone()),
            agreements: AgreementService::new(pool.clone(), creator),
            payments,
            pool,
        }
    }

    pub async fn customer(&self) -> AuthenticatedUser {
        let user = self
            .users
            .register_customer(TestDataFactory::registration("customer"))
            .await
            .expect("Failed to register customer");

        AuthenticatedUser {
            user_id: user.id,
            roles: vec![ROLE_CUSTOMER.to_string()],
        }
    }

    pub async fn staff(&self) -> AuthenticatedUser {
        let user = self
            .users
            .register_staff(TestDataFactory::registration("staff"))
            .await
            .expect("Failed to register staff");

        AuthenticatedUser {
            user_id: user.id,
            roles: vec![ROLE_STAFF.to_string()],
        }
    }

    pub async fn vehicle(&self, price: Decimal) -> Vehicle {
        self.vehicles
            .create_vehicle(TestDataFactory::vehicle_request(price))
            .await
            .expect("Failed to create vehicle")
    }

    pub async fn vehicle_status(&self, vehicle_id: i64) -> VehicleStatus {
        self.vehicles
            .get_vehicle(vehicle_id)
            .await
            .expect("Vehicle should exist")
            .status
    }

    /// Pending booking proposed for two days from now
    pub async fn pending_booking(&self, customer: &AuthenticatedUser, vehicle: &Vehicle) -> Booking {
        self.bookings
            .create_booking(customer.user_id, vehicle.id, Utc::now() + Duration::days(2))
            .await
            .expect("Failed to create booking")
    }

    pub async fn confirmed_booking(
        &self,
        customer: &AuthenticatedUser,
        staff: &AuthenticatedUser,
        vehicle: &Vehicle,
    ) -> Booking {
        let booking = self.pending_booking(customer, vehicle).await;
        self.bookings
            .confirm_schedule(booking.id, staff.user_id, "Showroom A")
            .await
            .expect("Failed to confirm booking");
        booking
    }

    /// Customer, staff, vehicle, confirmed booking and agreement in one go
    pub async fn agreement(
        &self,
        price: Decimal,
        payment_type: PaymentType,
    ) -> (AuthenticatedUser, Vehicle, Agreement) {
        let customer = self.customer().await;
        let staff = self.staff().await;
        let vehicle = self.vehicle(price).await;
        let booking = self.confirmed_booking(&customer, &staff, &vehicle).await;

        let agreement = self
            .agreements
            .create_agreement(CreateAgreementRequest {
                booking_id: booking.id,
                final_price: price,
                payment_type,
                terms: "Standard terms".to_string(),
            })
            .await
            .expect("Failed to create agreement");

        (customer, vehicle, agreement)
    }
}

pub struct TestDataFactory;

impl TestDataFactory {
    pub fn unique(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4().simple())
    }

    pub fn registration(prefix: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            full_name: format!("Test {}", prefix),
            email: format!("{}@mobigo.test", Self::unique(prefix)),
            password: "password-123".to_string(),
            phone_number: "+620000000000".to_string(),
            address: "Jl. Testing 1".to_string(),
        }
    }

    pub fn vehicle_request(price: Decimal) -> CreateVehicleRequest {
        CreateVehicleRequest {
            make: "Toyota".to_string(),
            model: "Avanza".to_string(),
            year: 2023,
            vin: Self::unique("VIN"),
            price,
            description: "Integration test vehicle".to_string(),
            status: None,
        }
    }
}
