//! The clinic's "help me choose" service selector.
use super::definition::{QuestionDefinition, TreeDefinition};
use crate::i18n::Localized;

fn t(es: &str, en: &str) -> Localized {
    Localized::new(es, en)
}

pub fn clinic_tree() -> TreeDefinition {
    TreeDefinition {
        root: "root".to_string(),
        questions: vec![
            QuestionDefinition::new("root", t("¿Qué necesitas?", "What do you need?"))
                .icon("stethoscope")
                .ask(t("Consulta", "Consultation"), "consulta")
                .ask(t("Ultrasonido", "Ultrasound"), "ultrasonido")
                .ask(t("Anticonceptivos", "Contraception"), "anticonceptivos")
                .ask(t("Exámenes y procedimientos", "Tests and procedures"), "procedimientos"),
            // Consultations
            QuestionDefinition::new("consulta", t("¿Cuál es el motivo?", "What is the reason?"))
                .icon("clipboard")
                .pick(
                    t("Control ginecológico general", "General gynecological check-up"),
                    "consulta-gine",
                )
                .pick(t("Estoy embarazada", "I am pregnant"), "consulta-prenatal")
                .pick(t("Síntomas de menopausia", "Menopause symptoms"), "consulta-menopausia")
                .pick(
                    t("Quiero quedar embarazada", "I want to get pregnant"),
                    "consulta-fertilidad",
                ),
            // Ultrasounds
            QuestionDefinition::new("ultrasonido", t("¿Estás embarazada?", "Are you pregnant?"))
                .icon("baby")
                .ask(t("Sí, estoy embarazada", "Yes, I am pregnant"), "us-tipo")
                .ask(t("No", "No"), "us-ginecologico"),
            QuestionDefinition::new(
                "us-tipo",
                t("¿Qué ultrasonido necesitas?", "Which ultrasound do you need?"),
            )
            .pick(
                t("Ultrasonido de embarazo (normal)", "Pregnancy ultrasound (standard)"),
                "us-embarazo",
            )
            .pick(
                t("Ultrasonido morfológico (semanas 20 a 24)", "Anatomy scan (weeks 20 to 24)"),
                "us-morfologico",
            )
            .pick(t("Ultrasonido 4D", "4D ultrasound"), "us-4d")
            .pick(t("No estoy segura", "I am not sure"), "consulta-prenatal"),
            QuestionDefinition::new(
                "us-ginecologico",
                t("¿Qué zona se va a estudiar?", "Which area will be examined?"),
            )
            .pick(t("Pelvis (abdominal)", "Pelvis (abdominal)"), "us-pelvico")
            .pick(t("Útero y ovarios (transvaginal)", "Uterus and ovaries (transvaginal)"), "us-transvaginal")
            .pick(t("Mamas", "Breasts"), "us-mamas"),
            // Contraception
            QuestionDefinition::new(
                "anticonceptivos",
                t("¿Qué deseas hacer?", "What would you like to do?"),
            )
            .icon("shield")
            .ask(t("Colocar un método", "Get a method placed"), "metodo")
            .pick(t("Retirar un dispositivo", "Remove a device"), "retiro-dispositivo")
            .pick(t("Recibir asesoría", "Get advice"), "consulta-gine"),
            QuestionDefinition::new("metodo", t("¿Cuál método?", "Which method?"))
                .pick(t("T de cobre", "Copper IUD"), "t-cobre")
                .pick(t("Mirena", "Mirena"), "mirena")
                .pick(t("Implante subdérmico", "Contraceptive implant"), "implante")
                .pick(t("No estoy segura", "I am not sure"), "consulta-gine"),
            // Tests and procedures
            QuestionDefinition::new(
                "procedimientos",
                t("¿Qué examen o procedimiento?", "Which test or procedure?"),
            )
            .icon("microscope")
            .pick(t("Papanicolaou", "Pap smear"), "papanicolaou")
            .pick(t("Prueba de VPH", "HPV test"), "vph")
            .ask(
                t("Tuve un resultado alterado", "I had an abnormal result"),
                "resultado-alterado",
            ),
            QuestionDefinition::new(
                "resultado-alterado",
                t("¿Qué te indicó tu médico?", "What did your doctor recommend?"),
            )
            .pick(t("Colposcopía", "Colposcopy"), "colposcopia")
            .pick(t("Biopsia", "Biopsy"), "biopsia")
            .pick(t("No me indicaron nada", "Nothing specific"), "consulta-gine"),
        ],
    }
}
