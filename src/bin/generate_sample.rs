use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 10] = [
    "Prog", "Clave", "Nombre y Email", "Res1", "Res2", "Res3", "Observ1", "Observ2", "Observ3",
    "Grupo",
];

const PROGRAMS: [&str; 4] = ["ADM", "DER", "ING", "MED"];

/// Rating labels with their sampling weights.
const RATINGS: [(&str, f64); 6] = [
    ("INSUFICIENTE", 0.08),
    ("ACEPTABLE", 0.17),
    ("BUENO", 0.30),
    ("MUY BUENO", 0.25),
    ("SOBRESALIENTE", 0.15),
    ("No disponible", 0.05),
];

const FIRST_NAMES: [&str; 12] = [
    "Ana", "Luis", "María", "Carlos", "Lucía", "Jorge", "Sofía", "Diego", "Valeria", "Andrés",
    "Camila", "Miguel",
];
const LAST_NAMES: [&str; 10] = [
    "García", "Rodríguez", "López", "Martínez", "Pérez", "Gómez", "Sánchez", "Díaz", "Torres",
    "Ramírez",
];

const POSITIVE: [&str; 6] = [
    "Participa activamente en clase",
    "Excelente trabajo en equipo",
    "Entrega puntual de las tareas",
    "Muestra gran interés por la materia",
    "Buena comprensión de los conceptos",
    "Presentación clara y bien organizada",
];
const NEGATIVE: [&str; 5] = [
    "Entrega tardía de tareas",
    "Poca participación en clase",
    "Dificultad con los conceptos básicos",
    "Faltas frecuentes a clase",
    "Trabajo incompleto",
];
const NEUTRAL: [&str; 3] = [
    "Asistió a tutoría",
    "Cambió de grupo a mitad del semestre",
    "Solicitó revisión de calificación",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn weighted<'a>(&mut self, items: &'a [(&'a str, f64)]) -> &'a str {
        let mut r = self.next_f64() * items.iter().map(|(_, w)| w).sum::<f64>();
        for (label, w) in items {
            if r < *w {
                return label;
            }
            r -= w;
        }
        items[items.len() - 1].0
    }
}

/// Observation text, tagged `(p)` / `(n)` the way evaluators write them.
fn observation(rng: &mut SimpleRng) -> String {
    let roll = rng.next_f64();
    if roll < 0.45 {
        format!("{} (p)", rng.pick(&POSITIVE))
    } else if roll < 0.75 {
        format!("{} (n)", rng.pick(&NEGATIVE))
    } else if roll < 0.90 {
        rng.pick(&NEUTRAL).to_string()
    } else {
        String::new()
    }
}

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("datos.xlsx"));
    let n_students = 120;
    let mut rng = SimpleRng::new(42);

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Estudiantes")?;

    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for i in 0..n_students {
        let row = i as u32 + 1;
        let first = rng.pick(&FIRST_NAMES);
        let last = rng.pick(&LAST_NAMES);
        let email = format!(
            "{}.{}{}@universidad.edu",
            first.to_lowercase(),
            last.to_lowercase(),
            i
        );

        sheet.write_string(row, 0, *rng.pick(&PROGRAMS))?;
        sheet.write_number(row, 1, (20250000 + i) as f64)?;
        sheet.write_string(row, 2, format!("{first} {last} - {email}"))?;
        for slot in 0..3u16 {
            sheet.write_string(row, 3 + slot, rng.weighted(&RATINGS))?;
        }
        for slot in 0..3u16 {
            let obs = observation(&mut rng);
            if !obs.is_empty() {
                sheet.write_string(row, 6 + slot, obs)?;
            }
        }
        sheet.write_string(row, 9, if i % 2 == 0 { "A" } else { "B" })?;
    }

    sheet.autofit();
    workbook
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;

    println!("Wrote {} with {n_students} students", out.display());
    Ok(())
}
