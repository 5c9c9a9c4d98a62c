use event_commerce_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

// Fixed ids keep the seed idempotent and easy to reference from a client.
const EVENT_ID: Uuid = Uuid::from_u128(0x0e0e_0000_0000_4000_8000_000000000001);
const COMPANY_ID: Uuid = Uuid::from_u128(0x0c0c_0000_0000_4000_8000_000000000001);
const BUYER_ID: Uuid = Uuid::from_u128(0x0b0b_0000_0000_4000_8000_000000000001);

struct SeedResource {
    id: u128,
    kind: &'static str,
    parent: Option<u128>,
    name: &'static str,
    unit_price: i64,
    allotted: Option<i32>,
}

const RESOURCES: &[SeedResource] = &[
    SeedResource { id: 0x101, kind: "ticket", parent: None, name: "General Admission", unit_price: 5_000, allotted: None },
    SeedResource { id: 0x102, kind: "ticket", parent: None, name: "VIP Pass", unit_price: 20_000, allotted: Some(50) },
    SeedResource { id: 0x201, kind: "booth", parent: None, name: "Exhibition Booth", unit_price: 0, allotted: None },
    SeedResource { id: 0x202, kind: "booth_sub_type", parent: Some(0x201), name: "Booth 3x3", unit_price: 150_000, allotted: Some(20) },
    SeedResource { id: 0x203, kind: "booth_sub_type", parent: Some(0x201), name: "Booth 6x3", unit_price: 280_000, allotted: Some(8) },
    SeedResource { id: 0x301, kind: "sponsor_package", parent: None, name: "Gold Sponsor", unit_price: 1_000_000, allotted: Some(1) },
    SeedResource { id: 0x302, kind: "sponsor_package", parent: None, name: "Silver Sponsor", unit_price: 400_000, allotted: Some(5) },
    // Room types hang off a hotel id that has no catalog row of its own.
    SeedResource { id: 0x402, kind: "hotel_room_type", parent: Some(0x401), name: "Harbour Hotel Double", unit_price: 10_000, allotted: Some(30) },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = create_pool(&config.database_url, config.max_connections).await?;

    seed_catalog(&pool).await?;
    seed_company(&pool).await?;
    seed_discounts(&pool).await?;

    println!("Seed completed. Event ID: {EVENT_ID}, Company ID: {COMPANY_ID}, Buyer ID: {BUYER_ID}");
    Ok(())
}

fn resource_id(suffix: u128) -> Uuid {
    Uuid::from_u128(0x0a0a_0000_0000_4000_8000_000000000000 | suffix)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for resource in RESOURCES {
        sqlx::query(
            r#"
            INSERT INTO resources (id, event_id, kind, parent_id, name, unit_price, allotted_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(resource_id(resource.id))
        .bind(EVENT_ID)
        .bind(resource.kind)
        .bind(resource.parent.map(resource_id))
        .bind(resource.name)
        .bind(resource.unit_price)
        .bind(resource.allotted)
        .execute(pool)
        .await?;
    }

    println!("Seeded {} catalog resources", RESOURCES.len());
    Ok(())
}

async fn seed_company(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO companies
            (id, name, contact_name, email, phone, address_line1, city, postal_code, country)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(COMPANY_ID)
    .bind("Ferris Exhibits Ltd")
    .bind("Ada Ferris")
    .bind("ada@ferris.example")
    .bind("+44 20 7946 0000")
    .bind("1 Harbour Street")
    .bind("London")
    .bind("E1 6AN")
    .bind("GB")
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO company_members (id, company_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (company_id, user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(COMPANY_ID)
    .bind(BUYER_ID)
    .execute(pool)
    .await?;

    println!("Seeded company and member");
    Ok(())
}

async fn seed_discounts(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO coupons (id, code, discount_kind, discount_value)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("SUMMER25")
    .bind("percentage")
    .bind(25_i64)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO promotional_offers (id, event_id, name, percentage, scope)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(Uuid::from_u128(0x0f0f_0000_0000_4000_8000_000000000001))
    .bind(EVENT_ID)
    .bind("Early hotel booking")
    .bind(10_i32)
    .bind("hotels")
    .execute(pool)
    .await?;

    println!("Seeded coupon SUMMER25 and hotel offer");
    Ok(())
}
