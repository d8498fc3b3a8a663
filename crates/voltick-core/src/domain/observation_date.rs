use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::{Date, Month, PrimitiveDateTime, Time};

/// Calendar date and wall-clock time of one screener observation.
///
/// Feed dates carry no offset, so this wraps a `PrimitiveDateTime`. Ordering
/// is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationDate(PrimitiveDateTime);

impl ObservationDate {
    pub fn new(date: Date, time: Time) -> Self {
        Self(PrimitiveDateTime::new(date, time))
    }

    /// Midnight on the given calendar day, `None` if the day does not exist.
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        let date = Date::from_calendar_date(year, month, day).ok()?;
        Some(Self::new(date, Time::MIDNIGHT))
    }

    /// Best-effort parse of free-form feed text.
    ///
    /// Day-first on ambiguous numeric dates, ISO order when the year leads,
    /// month names anywhere. The first complete day/month/year wins and any
    /// later numbers are noise, except that a lone trailing hour is read as
    /// the time when no clock is present. Clocks are `HH:MM[:SS]` or `H am`
    /// with an optional AM/PM marker; a signed offset after a clock or after
    /// `GMT`/`UTC` is skipped. Unknown words are skipped. Returns `None` when
    /// no complete day/month/year can be recovered.
    pub fn parse(input: &str) -> Option<Self> {
        let tokens = tokenize(input);
        let mut numbers: Vec<Number> = Vec::new();
        let mut month_name: Option<u8> = None;
        let mut clock: Option<(u32, u32, u32)> = None;
        let mut meridiem: Option<Meridiem> = None;
        let mut offset_allowed = false;

        let mut index = 0;
        while index < tokens.len() {
            let rest = &tokens[index..];
            match &tokens[index] {
                Token::Number(number) => {
                    if let Some((parsed, consumed)) = read_clock(rest) {
                        // The first clock wins.
                        if clock.is_none() {
                            clock = Some(parsed);
                        }
                        offset_allowed = true;
                        index += consumed;
                        continue;
                    }
                    if let Some((hour, marker)) = read_hour_meridiem(rest) {
                        if clock.is_none() {
                            clock = Some((hour, 0, 0));
                            meridiem = Some(marker);
                        }
                        offset_allowed = false;
                        index += 2;
                        continue;
                    }
                    numbers.push(*number);
                    offset_allowed = false;
                }
                Token::Word(word) => {
                    offset_allowed = is_zone_name(word);
                    if let Some(month) = month_from_name(word) {
                        match month_name {
                            Some(existing) if existing != month => return None,
                            _ => month_name = Some(month),
                        }
                    } else if let Some(marker) = Meridiem::from_word(word) {
                        meridiem = Some(marker);
                    }
                }
                Token::Separator('+' | '-') if offset_allowed => {
                    offset_allowed = false;
                    if let Some(consumed) = read_offset(&rest[1..]) {
                        index += 1 + consumed;
                        continue;
                    }
                }
                Token::Separator(_) => {}
            }
            index += 1;
        }

        let ((year, month, day), used) = resolve_ymd(&numbers, month_name)?;
        let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
        let date = Date::from_calendar_date(year, month, u8::try_from(day).ok()?).ok()?;

        let clock = clock.or_else(|| match numbers.get(used) {
            Some(hour) if hour.digits <= 2 && hour.value <= 23 => Some((hour.value, 0, 0)),
            _ => None,
        });
        let time = match clock {
            Some((hour, minute, second)) => {
                let hour = apply_meridiem(hour, meridiem)?;
                Time::from_hms(
                    u8::try_from(hour).ok()?,
                    u8::try_from(minute).ok()?,
                    u8::try_from(second).ok()?,
                )
                .ok()?
            }
            None => Time::MIDNIGHT,
        };

        Some(Self::new(date, time))
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    pub fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }
}

impl Display for ObservationDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let date = self.0.date();
        let time = self.0.time();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
            time.hour(),
            time.minute(),
            time.second()
        )
    }
}

impl Serialize for ObservationDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Number {
    value: u32,
    digits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(Number),
    Word(String),
    Separator(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "am" | "a" => Some(Self::Am),
            "pm" | "p" => Some(Self::Pm),
            _ => None,
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&next) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                digits.push(next);
                chars.next();
            }
            // Runs too long for any date field can never resolve; drop them
            // as noise rather than overflowing.
            if let Ok(value) = digits.parse::<u32>() {
                tokens.push(Token::Number(Number {
                    value,
                    digits: digits.len(),
                }));
            }
        } else if ch.is_alphabetic() {
            let mut word = String::new();
            while let Some(&next) = chars.peek() {
                if !next.is_alphabetic() {
                    break;
                }
                word.extend(next.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            if matches!(ch, '-' | '/' | '.' | ':' | '+') {
                tokens.push(Token::Separator(ch));
            }
            chars.next();
        }
    }

    tokens
}

/// Reads `H:M` or `H:M:S` at the start of `tokens`, returning the clock and
/// the number of tokens consumed.
fn read_clock(tokens: &[Token]) -> Option<((u32, u32, u32), usize)> {
    let hour = match tokens.first()? {
        Token::Number(number) if number.digits <= 2 => number.value,
        _ => return None,
    };
    if tokens.get(1) != Some(&Token::Separator(':')) {
        return None;
    }
    let minute = match tokens.get(2)? {
        Token::Number(number) if number.digits == 2 => number.value,
        _ => return None,
    };

    if tokens.get(3) == Some(&Token::Separator(':')) {
        if let Some(Token::Number(number)) = tokens.get(4) {
            if number.digits == 2 {
                let mut consumed = 5;
                // Fractional seconds are dropped.
                if tokens.get(5) == Some(&Token::Separator('.'))
                    && matches!(tokens.get(6), Some(Token::Number(_)))
                {
                    consumed = 7;
                }
                return Some(((hour, minute, number.value), consumed));
            }
        }
    }

    Some(((hour, minute, 0), 3))
}

/// `H am` / `H pm` at the start of `tokens`.
fn read_hour_meridiem(tokens: &[Token]) -> Option<(u32, Meridiem)> {
    match tokens {
        [Token::Number(hour), Token::Word(word), ..]
            if hour.digits <= 2 && (1..=12).contains(&hour.value) =>
        {
            Meridiem::from_word(word).map(|marker| (hour.value, marker))
        }
        _ => None,
    }
}

/// Length of a `HH[:MM]`, `HHMM` or `H` offset body following a sign. A
/// body that runs into a date separator belongs to a date instead.
fn read_offset(tokens: &[Token]) -> Option<usize> {
    let consumed = match tokens {
        [Token::Number(hours), Token::Separator(':'), Token::Number(minutes), ..]
            if hours.digits <= 2 && minutes.digits == 2 =>
        {
            3
        }
        [Token::Number(number), ..] if matches!(number.digits, 1 | 2 | 4) => 1,
        _ => return None,
    };

    match tokens.get(consumed) {
        Some(Token::Separator('/' | '-' | '.')) => None,
        _ => Some(consumed),
    }
}

fn is_zone_name(word: &str) -> bool {
    matches!(word, "gmt" | "utc" | "z")
}

/// Year, month and day from the first complete group of `numbers`, plus how
/// many numbers that group used.
fn resolve_ymd(numbers: &[Number], month_name: Option<u8>) -> Option<((i32, u32, u32), usize)> {
    if let Some(month) = month_name {
        let [first, second, ..] = numbers else {
            return None;
        };
        let (year, day) = if looks_like_year(*first) {
            (*first, *second)
        } else {
            (*second, *first)
        };
        return Some(((expand_year(year), u32::from(month), day.value), 2));
    }

    match numbers {
        [compact, ..] if compact.digits == 8 => {
            let value = compact.value;
            let year = i32::try_from(value / 10_000).ok()?;
            Some(((year, (value / 100) % 100, value % 100), 1))
        }
        [first, second, third, ..] => {
            if looks_like_year(*first) {
                return Some(((expand_year(*first), second.value, third.value), 3));
            }

            let (day, month) = if second.value > 12 && first.value <= 12 {
                (second.value, first.value)
            } else {
                (first.value, second.value)
            };
            Some(((expand_year(*third), month, day), 3))
        }
        _ => None,
    }
}

fn looks_like_year(number: Number) -> bool {
    number.digits >= 3 || number.value > 31
}

fn expand_year(number: Number) -> i32 {
    let value = i32::try_from(number.value).unwrap_or(i32::MAX);
    if number.digits > 2 {
        return value;
    }
    if value <= 68 {
        2000 + value
    } else {
        1900 + value
    }
}

fn apply_meridiem(hour: u32, meridiem: Option<Meridiem>) -> Option<u32> {
    match meridiem {
        None => Some(hour),
        Some(_) if hour == 0 || hour > 12 => None,
        Some(Meridiem::Am) => Some(if hour == 12 { 0 } else { hour }),
        Some(Meridiem::Pm) => Some(if hour == 12 { 12 } else { hour + 12 }),
    }
}

fn month_from_name(word: &str) -> Option<u8> {
    let month = match word {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}
