use chrono::{Duration, Utc};
use lipsum::lipsum_words;
use rand::Rng;
use uuid::Uuid;

const NUM_USERS: usize = 5;
const NUM_SUBJECTS: usize = 8;

const NUM_COMMENTS: usize = 200;
const NUM_MENTIONS: usize = 60;
const NUM_REACTIONS: usize = 120;

const REPLY_PROBABILITY: f64 = 0.6;
const SOFT_DELETE_PROBABILITY: f64 = 0.05;
const COMMENT_MIN_WORDS: usize = 4;
const COMMENT_MAX_WORDS: usize = 24;

const EMOJIS: &[&str] = &["👍", "🎉", "❤️", "😂", "🔥"];

fn gen_n_items(table: &str, n: usize, mut f: impl FnMut(usize) -> String) {
    println!("INSERT INTO {} VALUES", table);
    for i in 0..n {
        if i != 0 {
            println!(",");
        }
        print!("    {}", f(i));
    }
    println!();
    println!("ON CONFLICT DO NOTHING;");
}

fn main() {
    let mut rng = rand::thread_rng();
    let base = Utc::now() - Duration::days(30);

    // Generate user profiles
    let mut users = Vec::new();
    gen_n_items("profiles", NUM_USERS, |i| {
        let id = Uuid::new_v4();
        users.push(id);
        format!("('{}', 'user{}', NULL)", id, i)
    });

    // Generate subjects (the entities threads hang off of)
    let mut subjects = Vec::new();
    gen_n_items("subjects", NUM_SUBJECTS, |_| {
        let id = Uuid::new_v4();
        subjects.push(id);
        format!("('{}', '{}')", id, lipsum_words(3).replace('\'', ""))
    });

    // Generate comments, chronologically, so any reply can point at an
    // already-inserted comment of the same subject
    let mut comments: Vec<(Uuid, Uuid)> = Vec::new(); // (id, subject)
    gen_n_items("comments", NUM_COMMENTS, |i| {
        let id = Uuid::new_v4();
        let subject = subjects[rng.gen_range(0..subjects.len())];
        let earlier: Vec<Uuid> = comments
            .iter()
            .filter(|(_, s)| *s == subject)
            .map(|(c, _)| *c)
            .collect();
        let parent = match !earlier.is_empty() && rng.gen_bool(REPLY_PROBABILITY) {
            true => format!("'{}'", earlier[rng.gen_range(0..earlier.len())]),
            false => String::from("NULL"),
        };
        comments.push((id, subject));
        let created = base + Duration::minutes(i as i64 * 7);
        let edited = rng.gen_bool(0.1);
        let updated = match edited {
            true => created + Duration::minutes(rng.gen_range(1..60)),
            false => created,
        };
        let deleted = match rng.gen_bool(SOFT_DELETE_PROBABILITY) {
            true => format!("'{}'", (updated + Duration::hours(1)).to_rfc3339()),
            false => String::from("NULL"),
        };
        format!(
            "('{}', '{}', '{}', {}, '{}', '{}', '{}', {}, {})",
            id,
            subject,
            users[rng.gen_range(0..users.len())],
            parent,
            lipsum_words(rng.gen_range(COMMENT_MIN_WORDS..COMMENT_MAX_WORDS)).replace('\'', ""),
            created.to_rfc3339(),
            updated.to_rfc3339(),
            edited,
            deleted,
        )
    });

    // Generate mentions
    gen_n_items("comment_mentions", NUM_MENTIONS, |_| {
        format!(
            "('{}', '{}', '{}')",
            Uuid::new_v4(),
            comments[rng.gen_range(0..comments.len())].0,
            users[rng.gen_range(0..users.len())],
        )
    });

    // Generate reactions; duplicate (comment, user, emoji) triples are
    // swallowed by the ON CONFLICT clause, matching the unique constraint
    gen_n_items("comment_reactions", NUM_REACTIONS, |i| {
        format!(
            "('{}', '{}', '{}', '{}', '{}')",
            Uuid::new_v4(),
            comments[rng.gen_range(0..comments.len())].0,
            users[rng.gen_range(0..users.len())],
            EMOJIS[rng.gen_range(0..EMOJIS.len())],
            (base + Duration::minutes(NUM_COMMENTS as i64 * 7 + i as i64)).to_rfc3339(),
        )
    });
}
