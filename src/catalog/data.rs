//! The clinic's published services and prices.
use super::service::{Category, Service};
use crate::i18n::Localized;

fn service(
    id: &str,
    name: (&str, &str),
    duration: &str,
    price: u64,
    category: Category,
    info_key: Option<&str>,
) -> Service {
    Service {
        id: id.to_string(),
        name: Localized::new(name.0, name.1),
        duration: duration.to_string(),
        price,
        price_note: None,
        category,
        info_key: info_key.map(str::to_string),
    }
}

fn with_note(mut service: Service, es: &str, en: &str) -> Service {
    service.price_note = Some(Localized::new(es, en));
    service
}

pub fn clinic_services() -> Vec<Service> {
    vec![
        // Consultations
        service(
            "consulta-gine",
            ("Consulta ginecológica", "Gynecological consultation"),
            "45 min (1ª vez) / 30 min",
            45_000,
            Category::Consulta,
            Some("services.consultaGine"),
        ),
        service(
            "consulta-prenatal",
            ("Control prenatal", "Prenatal check-up"),
            "45 min (1ª vez) / 30 min",
            50_000,
            Category::Consulta,
            Some("services.prenatal"),
        ),
        service(
            "consulta-menopausia",
            ("Consulta de menopausia", "Menopause consultation"),
            "45 min",
            45_000,
            Category::Consulta,
            Some("services.menopausia"),
        ),
        service(
            "consulta-fertilidad",
            ("Consulta de fertilidad", "Fertility consultation"),
            "60 min",
            60_000,
            Category::Consulta,
            Some("services.fertilidad"),
        ),
        // Ultrasounds
        service(
            "us-pelvico",
            ("Ultrasonido pélvico", "Pelvic ultrasound"),
            "30 min",
            40_000,
            Category::Ultrasonido,
            None,
        ),
        service(
            "us-transvaginal",
            ("Ultrasonido transvaginal", "Transvaginal ultrasound"),
            "30 min",
            40_000,
            Category::Ultrasonido,
            Some("services.transvaginal"),
        ),
        service(
            "us-mamas",
            ("Ultrasonido de mamas", "Breast ultrasound"),
            "30 min",
            45_000,
            Category::Ultrasonido,
            None,
        ),
        service(
            "us-embarazo",
            ("Ultrasonido de embarazo", "Pregnancy ultrasound"),
            "30 min",
            40_000,
            Category::Ultrasonido,
            Some("services.usEmbarazo"),
        ),
        with_note(
            service(
                "us-morfologico",
                ("Ultrasonido morfológico", "Anatomy scan"),
                "60 min",
                85_000,
                Category::Ultrasonido,
                Some("services.morfologico"),
            ),
            "Entre las semanas 20 y 24",
            "Between weeks 20 and 24",
        ),
        service(
            "us-4d",
            ("Ultrasonido 4D", "4D ultrasound"),
            "45 min",
            70_000,
            Category::Ultrasonido,
            None,
        ),
        // Contraceptive devices
        with_note(
            service(
                "t-cobre",
                ("Colocación de T de cobre", "Copper IUD insertion"),
                "45 min",
                120_000,
                Category::Dispositivos,
                Some("services.tCobre"),
            ),
            "Incluye el dispositivo",
            "Device included",
        ),
        with_note(
            service(
                "mirena",
                ("Colocación de Mirena", "Mirena insertion"),
                "45 min",
                250_000,
                Category::Dispositivos,
                Some("services.mirena"),
            ),
            "Incluye el dispositivo",
            "Device included",
        ),
        with_note(
            service(
                "implante",
                ("Implante subdérmico", "Contraceptive implant"),
                "30 min",
                150_000,
                Category::Dispositivos,
                None,
            ),
            "Incluye el implante",
            "Implant included",
        ),
        service(
            "retiro-dispositivo",
            ("Retiro de dispositivo", "Device removal"),
            "30 min",
            40_000,
            Category::Dispositivos,
            None,
        ),
        // Procedures
        service(
            "papanicolaou",
            ("Papanicolaou", "Pap smear"),
            "30 min",
            35_000,
            Category::Procedimientos,
            Some("services.papanicolaou"),
        ),
        service(
            "colposcopia",
            ("Colposcopía", "Colposcopy"),
            "30 min",
            60_000,
            Category::Procedimientos,
            Some("services.colposcopia"),
        ),
        with_note(
            service(
                "biopsia",
                ("Biopsia de cérvix", "Cervical biopsy"),
                "45 min",
                95_000,
                Category::Procedimientos,
                None,
            ),
            "Análisis de patología aparte",
            "Pathology billed separately",
        ),
        // Laboratory
        service(
            "vph",
            ("Prueba de VPH", "HPV test"),
            "15 min",
            55_000,
            Category::Laboratorio,
            None,
        ),
    ]
}
