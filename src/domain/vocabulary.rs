//! Word lists and numeric ranges for UK Year 3 maths (ages 7-8)
//!
//! These tables are data consumed by the evaluators. Stems are matched at the
//! start of a word, word lists against whole tokens.

// Benchmark: real-world context

pub const CONTEXT_SCENARIOS: &[&str] = &[
    "shop", "store", "school", "playground", "party", "birthday", "garden", "kitchen",
    "classroom", "library", "park", "home", "farm", "zoo", "picnic", "fair", "market",
    "bakery", "sports", "game",
];

pub const CHILD_NAMES: &[&str] = &[
    "sam", "emma", "jack", "lily", "oliver", "sophie", "harry", "mia", "charlie", "ella",
    "thomas", "grace", "george", "ruby", "james", "chloe", "leo", "ava", "noah", "isla",
    "oscar", "poppy", "max", "rosie",
];

pub const ACTION_VERBS: &[&str] = &[
    "has", "have", "gives", "gave", "gets", "got", "shares", "shared", "buys", "bought",
    "sells", "sold", "finds", "found", "picks", "picked", "collects", "collected", "counts",
    "counted", "adds", "added", "takes", "took", "eats", "ate", "makes", "made", "puts", "put",
];

// Benchmark: clear language

pub const QUESTION_OPENERS: &[&str] = &["how many", "what is", "find the", "work out", "calculate"];

pub const VAGUE_QUANTIFIERS: &[&str] = &["some", "few", "several", "many", "lots"];

pub const MAX_BENCHMARK_WORDS: usize = 25;

// Benchmark: age-appropriateness

pub const BENCHMARK_COMPLEX_WORDS: &[&str] = &[
    "calculate", "determine", "evaluate", "compute", "quotient", "dividend", "multiplicand",
    "subsequently", "therefore", "hence",
];

pub const INAPPROPRIATE_THEMES: &[&str] = &[
    "death", "deaths", "violence", "violent", "alcohol", "gambling", "war", "wars", "weapon",
    "weapons", "scary", "horror", "blood", "injury", "injuries",
];

pub const POSITIVE_STEMS: &[&str] = &[
    "share", "give", "help", "friend", "together", "fun", "happy", "play", "game", "win",
    "collect", "find",
];

// Benchmark: concrete objects

pub const CONCRETE_OBJECTS: &[&str] = &[
    // food
    "apple", "apples", "orange", "oranges", "banana", "bananas", "sweet", "sweets", "cake",
    "cakes", "biscuit", "biscuits", "cookie", "cookies", "pizza", "sandwich",
    // toys and games
    "toy", "toys", "ball", "balls", "marble", "marbles", "card", "cards", "dice", "teddy",
    "teddies", "doll", "dolls", "car", "cars", "lego", "blocks",
    // school
    "pencil", "pencils", "pen", "pens", "book", "books", "ruler", "rulers", "crayon",
    "crayons", "sticker", "stickers", "eraser", "erasers", "notebook",
    // money
    "penny", "pennies", "pound", "pounds", "coin", "coins", "pence", "note", "notes",
    // nature
    "flower", "flowers", "tree", "trees", "leaf", "leaves", "bird", "birds", "butterfly",
    "butterflies", "ladybird", "ladybirds",
    // people
    "child", "children", "friend", "friends", "pupil", "pupils", "team", "teams", "class",
    "group", "groups", "family", "families",
    // containers
    "box", "boxes", "bag", "bags", "basket", "baskets", "jar", "jars", "packet", "packets",
];

/// Advisory wording per operation topic; never affects the score.
pub fn topic_hint_words(topic: &str) -> Option<&'static [&'static str]> {
    match topic {
        "multiplication" => Some(&["groups", "rows", "arrays", "packs", "bags"]),
        "division" => Some(&["shared", "equal", "groups", "each", "everyone"]),
        "addition" => Some(&["altogether", "total", "more", "combined"]),
        "subtraction" => Some(&["left", "remaining", "gave away", "fewer"]),
        _ => None,
    }
}

// Curriculum validator

pub const CURRICULUM_COMPLEX_WORDS: &[&str] = &[
    "calculate", "determine", "evaluate", "compute", "quotient", "dividend", "multiplicand",
    "minuend", "subtrahend", "addend", "augend", "integer", "subsequently", "therefore",
    "hence", "consequently", "approximately",
];

pub const CONTEXT_NOUN_STEMS: &[&str] = &[
    "apple", "toy", "book", "child", "sweet", "pencil", "coin", "sticker", "marble", "cake",
    "biscuit", "flower", "ball",
];

pub const MAX_SENTENCE_WORDS: usize = 20;
pub const MIN_QUESTION_CHARS: usize = 10;

pub const MAX_PRODUCT: f64 = 100.0;
pub const TIMES_TABLES: std::ops::RangeInclusive<u64> = 2..=10;
pub const TABLE_MULTIPLIERS: std::ops::RangeInclusive<u64> = 1..=12;
pub const MAX_DIVIDEND: f64 = 100.0;
pub const DIVISORS: &[u64] = &[2, 3, 4, 5, 8, 10];
pub const MAX_SUM: f64 = 1000.0;
pub const MAX_MINUEND: f64 = 1000.0;
pub const MAX_PLACE_VALUE: f64 = 1000.0;
pub const FRACTION_DENOMINATORS: &[u64] = &[2, 3, 4, 5, 8, 10];

// Operation keywords, matched as whole words
pub const MULTIPLICATION_WORDS: &[&str] = &[
    "times", "multiply", "multiplies", "multiplied", "groups of", "lots of",
];
pub const DIVISION_WORDS: &[&str] = &[
    "divide", "divides", "divided", "share", "shares", "shared", "sharing", "split", "splits",
    "equal groups",
];
pub const ADDITION_WORDS: &[&str] = &[
    "add", "adds", "added", "adding", "plus", "more", "total", "altogether",
];
pub const SUBTRACTION_WORDS: &[&str] = &[
    "subtract", "subtracts", "subtracted", "minus", "take away", "takes away", "less", "fewer",
];

// Gap analyzer

pub const WEAK_TOPIC_THRESHOLD: f64 = 60.0;
pub const HIGH_PRIORITY_THRESHOLD: f64 = 40.0;
pub const MIN_PERFORMANCES_FOR_TREND: usize = 3;
pub const TREND_MARGIN: f64 = 10.0;
pub const MAX_FOCUS_AREAS: usize = 5;

pub fn prerequisites(topic: &str) -> &'static [&'static str] {
    match topic {
        "multiplication_tables" => &["counting", "addition"],
        "division" => &["multiplication_tables", "subtraction"],
        "word_problems" => &["reading_comprehension", "addition", "subtraction"],
        "fractions" => &["division", "equal_parts"],
        "place_value" => &["counting", "number_recognition"],
        "addition_subtraction" => &["place_value", "counting"],
        _ => &[],
    }
}
