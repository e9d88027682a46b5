// src/bin/seed.rs
// DOCUMENTATION: Reference data loader
// PURPOSE: Upsert the Thai province list and the amenity catalog.
// Safe to run repeatedly; existing rows are updated in place.
//
// Usage: cargo run --bin seed

use anyhow::{Context, Result};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::time::Instant;

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

struct ProvinceSeed {
    slug: &'static str,
    name_en: &'static str,
    name_th: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
}

struct AmenitySeed {
    slug: &'static str,
    name_en: &'static str,
    name_th: &'static str,
    icon: &'static str,
}

macro_rules! province {
    ($slug:expr, $en:expr, $th:expr, $region:expr, $lat:expr, $lng:expr) => {
        ProvinceSeed {
            slug: $slug,
            name_en: $en,
            name_th: $th,
            region: $region,
            latitude: $lat,
            longitude: $lng,
        }
    };
}

/// The 77 provinces, grouped by the six-region system
const PROVINCES: &[ProvinceSeed] = &[
    // North
    province!("chiang-mai", "Chiang Mai", "เชียงใหม่", "north", 18.7883, 98.9853),
    province!("chiang-rai", "Chiang Rai", "เชียงราย", "north", 19.9105, 99.8406),
    province!("lampang", "Lampang", "ลำปาง", "north", 18.2888, 99.4909),
    province!("lamphun", "Lamphun", "ลำพูน", "north", 18.5745, 99.0087),
    province!("mae-hong-son", "Mae Hong Son", "แม่ฮ่องสอน", "north", 19.3020, 97.9654),
    province!("nan", "Nan", "น่าน", "north", 18.7756, 100.7730),
    province!("phayao", "Phayao", "พะเยา", "north", 19.1666, 99.9019),
    province!("phrae", "Phrae", "แพร่", "north", 18.1446, 100.1403),
    province!("uttaradit", "Uttaradit", "อุตรดิตถ์", "north", 17.6200, 100.0993),
    // Northeast
    province!("amnat-charoen", "Amnat Charoen", "อำนาจเจริญ", "northeast", 15.8657, 104.6258),
    province!("bueng-kan", "Bueng Kan", "บึงกาฬ", "northeast", 18.3609, 103.6466),
    province!("buriram", "Buriram", "บุรีรัมย์", "northeast", 14.9930, 103.1029),
    province!("chaiyaphum", "Chaiyaphum", "ชัยภูมิ", "northeast", 15.8068, 102.0315),
    province!("kalasin", "Kalasin", "กาฬสินธุ์", "northeast", 16.4314, 103.5058),
    province!("khon-kaen", "Khon Kaen", "ขอนแก่น", "northeast", 16.4419, 102.8360),
    province!("loei", "Loei", "เลย", "northeast", 17.4860, 101.7223),
    province!("maha-sarakham", "Maha Sarakham", "มหาสารคาม", "northeast", 16.1851, 103.3029),
    province!("mukdahan", "Mukdahan", "มุกดาหาร", "northeast", 16.5436, 104.7235),
    province!("nakhon-phanom", "Nakhon Phanom", "นครพนม", "northeast", 17.3920, 104.7690),
    province!("nakhon-ratchasima", "Nakhon Ratchasima", "นครราชสีมา", "northeast", 14.9799, 102.0978),
    province!("nong-bua-lamphu", "Nong Bua Lamphu", "หนองบัวลำภู", "northeast", 17.2041, 102.4407),
    province!("nong-khai", "Nong Khai", "หนองคาย", "northeast", 17.8783, 102.7420),
    province!("roi-et", "Roi Et", "ร้อยเอ็ด", "northeast", 16.0538, 103.6520),
    province!("sakon-nakhon", "Sakon Nakhon", "สกลนคร", "northeast", 17.1664, 104.1486),
    province!("sisaket", "Sisaket", "ศรีสะเกษ", "northeast", 15.1186, 104.3220),
    province!("surin", "Surin", "สุรินทร์", "northeast", 14.8818, 103.4936),
    province!("ubon-ratchathani", "Ubon Ratchathani", "อุบลราชธานี", "northeast", 15.2287, 104.8564),
    province!("udon-thani", "Udon Thani", "อุดรธานี", "northeast", 17.4138, 102.7872),
    province!("yasothon", "Yasothon", "ยโสธร", "northeast", 15.7944, 104.1453),
    // Central
    province!("bangkok", "Bangkok", "กรุงเทพมหานคร", "central", 13.7563, 100.5018),
    province!("ang-thong", "Ang Thong", "อ่างทอง", "central", 14.5896, 100.4550),
    province!("chai-nat", "Chai Nat", "ชัยนาท", "central", 15.1852, 100.1251),
    province!("kamphaeng-phet", "Kamphaeng Phet", "กำแพงเพชร", "central", 16.4828, 99.5227),
    province!("lopburi", "Lopburi", "ลพบุรี", "central", 14.7995, 100.6534),
    province!("nakhon-nayok", "Nakhon Nayok", "นครนายก", "central", 14.2069, 101.2130),
    province!("nakhon-pathom", "Nakhon Pathom", "นครปฐม", "central", 13.8199, 100.0622),
    province!("nakhon-sawan", "Nakhon Sawan", "นครสวรรค์", "central", 15.7047, 100.1372),
    province!("nonthaburi", "Nonthaburi", "นนทบุรี", "central", 13.8591, 100.5217),
    province!("pathum-thani", "Pathum Thani", "ปทุมธานี", "central", 14.0208, 100.5250),
    province!("phetchabun", "Phetchabun", "เพชรบูรณ์", "central", 16.4190, 101.1606),
    province!("phichit", "Phichit", "พิจิตร", "central", 16.4429, 100.3487),
    province!("phitsanulok", "Phitsanulok", "พิษณุโลก", "central", 16.8211, 100.2659),
    province!("phra-nakhon-si-ayutthaya", "Phra Nakhon Si Ayutthaya", "พระนครศรีอยุธยา", "central", 14.3532, 100.5689),
    province!("samut-prakan", "Samut Prakan", "สมุทรปราการ", "central", 13.5991, 100.5998),
    province!("samut-sakhon", "Samut Sakhon", "สมุทรสาคร", "central", 13.5475, 100.2744),
    province!("samut-songkhram", "Samut Songkhram", "สมุทรสงคราม", "central", 13.4098, 100.0023),
    province!("saraburi", "Saraburi", "สระบุรี", "central", 14.5289, 100.9101),
    province!("sing-buri", "Sing Buri", "สิงห์บุรี", "central", 14.8936, 100.3967),
    province!("sukhothai", "Sukhothai", "สุโขทัย", "central", 17.0056, 99.8264),
    province!("suphan-buri", "Suphan Buri", "สุพรรณบุรี", "central", 14.4745, 100.1177),
    province!("uthai-thani", "Uthai Thani", "อุทัยธานี", "central", 15.3835, 100.0245),
    // East
    province!("chachoengsao", "Chachoengsao", "ฉะเชิงเทรา", "east", 13.6904, 101.0780),
    province!("chanthaburi", "Chanthaburi", "จันทบุรี", "east", 12.6114, 102.1039),
    province!("chonburi", "Chonburi", "ชลบุรี", "east", 13.3611, 100.9847),
    province!("prachinburi", "Prachinburi", "ปราจีนบุรี", "east", 14.0509, 101.3717),
    province!("rayong", "Rayong", "ระยอง", "east", 12.6814, 101.2816),
    province!("sa-kaeo", "Sa Kaeo", "สระแก้ว", "east", 13.8240, 102.0646),
    province!("trat", "Trat", "ตราด", "east", 12.2428, 102.5175),
    // West
    province!("kanchanaburi", "Kanchanaburi", "กาญจนบุรี", "west", 14.0228, 99.5328),
    province!("phetchaburi", "Phetchaburi", "เพชรบุรี", "west", 13.1111, 99.9391),
    province!("prachuap-khiri-khan", "Prachuap Khiri Khan", "ประจวบคีรีขันธ์", "west", 11.8124, 99.7973),
    province!("ratchaburi", "Ratchaburi", "ราชบุรี", "west", 13.5283, 99.8134),
    province!("tak", "Tak", "ตาก", "west", 16.8840, 99.1259),
    // South
    province!("chumphon", "Chumphon", "ชุมพร", "south", 10.4930, 99.1800),
    province!("krabi", "Krabi", "กระบี่", "south", 8.0863, 98.9063),
    province!("nakhon-si-thammarat", "Nakhon Si Thammarat", "นครศรีธรรมราช", "south", 8.4304, 99.9631),
    province!("narathiwat", "Narathiwat", "นราธิวาส", "south", 6.4255, 101.8253),
    province!("pattani", "Pattani", "ปัตตานี", "south", 6.8696, 101.2501),
    province!("phang-nga", "Phang Nga", "พังงา", "south", 8.4501, 98.5255),
    province!("phatthalung", "Phatthalung", "พัทลุง", "south", 7.6167, 100.0740),
    province!("phuket", "Phuket", "ภูเก็ต", "south", 7.8804, 98.3923),
    province!("ranong", "Ranong", "ระนอง", "south", 9.9529, 98.6085),
    province!("satun", "Satun", "สตูล", "south", 6.6238, 100.0674),
    province!("songkhla", "Songkhla", "สงขลา", "south", 7.1898, 100.5954),
    province!("surat-thani", "Surat Thani", "สุราษฎร์ธานี", "south", 9.1382, 99.3217),
    province!("trang", "Trang", "ตรัง", "south", 7.5563, 99.6114),
    province!("yala", "Yala", "ยะลา", "south", 6.5411, 101.2804),
];

const AMENITIES: &[AmenitySeed] = &[
    AmenitySeed { slug: "wifi", name_en: "Wi-Fi", name_th: "ไวไฟ", icon: "wifi" },
    AmenitySeed { slug: "toilet", name_en: "Toilets", name_th: "ห้องน้ำ", icon: "toilet" },
    AmenitySeed { slug: "shower", name_en: "Showers", name_th: "ห้องอาบน้ำ", icon: "shower" },
    AmenitySeed { slug: "hot-water", name_en: "Hot water", name_th: "น้ำอุ่น", icon: "flame" },
    AmenitySeed { slug: "electricity", name_en: "Electricity", name_th: "ไฟฟ้า", icon: "plug" },
    AmenitySeed { slug: "parking", name_en: "Parking", name_th: "ที่จอดรถ", icon: "car" },
    AmenitySeed { slug: "restaurant", name_en: "Restaurant", name_th: "ร้านอาหาร", icon: "utensils" },
    AmenitySeed { slug: "kitchen", name_en: "Shared kitchen", name_th: "ครัวส่วนกลาง", icon: "cooking-pot" },
    AmenitySeed { slug: "campfire", name_en: "Campfire", name_th: "กองไฟ", icon: "campfire" },
    AmenitySeed { slug: "bbq", name_en: "BBQ grill", name_th: "เตาปิ้งย่าง", icon: "grill" },
    AmenitySeed { slug: "tent-rental", name_en: "Tent rental", name_th: "เช่าเต็นท์", icon: "tent" },
    AmenitySeed { slug: "pet-friendly", name_en: "Pet friendly", name_th: "สัตว์เลี้ยงเข้าได้", icon: "paw" },
    AmenitySeed { slug: "air-conditioning", name_en: "Air conditioning", name_th: "เครื่องปรับอากาศ", icon: "snowflake" },
    AmenitySeed { slug: "swimming", name_en: "Swimming", name_th: "เล่นน้ำได้", icon: "waves" },
    AmenitySeed { slug: "hiking", name_en: "Hiking trails", name_th: "เส้นทางเดินป่า", icon: "mountain" },
    AmenitySeed { slug: "kayak", name_en: "Kayaking", name_th: "พายเรือคายัค", icon: "sailboat" },
    AmenitySeed { slug: "mountain-view", name_en: "Mountain view", name_th: "วิวภูเขา", icon: "mountain-snow" },
    AmenitySeed { slug: "river-view", name_en: "River view", name_th: "วิวแม่น้ำ", icon: "droplets" },
    AmenitySeed { slug: "sea-view", name_en: "Sea view", name_th: "วิวทะเล", icon: "sunset" },
    AmenitySeed { slug: "security", name_en: "24h security", name_th: "รปภ. 24 ชม.", icon: "shield" },
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let started = Instant::now();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Could not connect to the database")?;

    println!("{}{}Seeding reference data{}", BOLD, CYAN, RESET);

    let mut tx = pool.begin().await?;

    for p in PROVINCES {
        sqlx::query(
            r#"
            INSERT INTO provinces (slug, name_en, name_th, region, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (slug) DO UPDATE
            SET name_en = EXCLUDED.name_en,
                name_th = EXCLUDED.name_th,
                region = EXCLUDED.region,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude
            "#,
        )
        .bind(p.slug)
        .bind(p.name_en)
        .bind(p.name_th)
        .bind(p.region)
        .bind(p.latitude)
        .bind(p.longitude)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to upsert province {}", p.slug))?;
    }
    println!("  {}✓{} {} provinces", GREEN, RESET, PROVINCES.len());

    for a in AMENITIES {
        sqlx::query(
            r#"
            INSERT INTO amenities (slug, name_en, name_th, icon)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO UPDATE
            SET name_en = EXCLUDED.name_en,
                name_th = EXCLUDED.name_th,
                icon = EXCLUDED.icon
            "#,
        )
        .bind(a.slug)
        .bind(a.name_en)
        .bind(a.name_th)
        .bind(a.icon)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to upsert amenity {}", a.slug))?;
    }
    println!("  {}✓{} {} amenities", GREEN, RESET, AMENITIES.len());

    tx.commit().await?;
    println!(
        "{}Done in {:.1}s{}",
        BOLD,
        started.elapsed().as_secs_f64(),
        RESET
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_provinces_unique_and_inside_thailand() {
        assert_eq!(PROVINCES.len(), 77);

        let slugs: HashSet<&str> = PROVINCES.iter().map(|p| p.slug).collect();
        assert_eq!(slugs.len(), PROVINCES.len());

        for p in PROVINCES {
            assert!((5.5..=20.5).contains(&p.latitude), "{}", p.slug);
            assert!((97.3..=105.7).contains(&p.longitude), "{}", p.slug);
        }
    }

    #[test]
    fn test_amenity_slugs_unique() {
        let slugs: HashSet<&str> = AMENITIES.iter().map(|a| a.slug).collect();
        assert_eq!(slugs.len(), AMENITIES.len());
    }
}
