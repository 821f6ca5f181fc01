use crate::domain::{Player, SeatIndex};

/// Места участников раздачи по часовой стрелке, начиная со следующего
/// после `from`. Само `from` (если участвует) идёт последним.
///
/// `players` отсортированы по месту.
pub fn clockwise_from(players: &[Player], from: SeatIndex) -> Vec<SeatIndex> {
    let seats = players.iter().filter(|p| !p.sitting_out).map(|p| p.seat);
    let (after, before): (Vec<SeatIndex>, Vec<SeatIndex>) = seats.partition(|&s| s > from);
    after.into_iter().chain(before).collect()
}

/// Следующий участник раздачи после `from` по кругу.
pub fn next_participant(players: &[Player], from: SeatIndex) -> Option<SeatIndex> {
    clockwise_from(players, from).into_iter().find(|&s| s != from)
}

/// Предложить следующую позицию кнопки:
/// - если кнопка уже была – следующий участник после неё;
/// - если нет – участник с самым младшим местом.
pub fn next_button(players: &[Player], current: Option<SeatIndex>) -> Option<SeatIndex> {
    match current {
        Some(button) => next_participant(players, button),
        None => players.iter().find(|p| !p.sitting_out).map(|p| p.seat),
    }
}

/// Места блайндов для кнопки `button`: (SB, BB).
///
/// Хедз-ап: кнопка ставит малый блайнд, соперник – большой.
pub fn blind_seats(players: &[Player], button: SeatIndex) -> Option<(SeatIndex, SeatIndex)> {
    let order = clockwise_from(players, button);
    match order.len() {
        0 | 1 => None,
        2 => Some((button, order[0])),
        _ => Some((order[0], order[1])),
    }
}

/// Место, сидящее перед `seat` (против часовой стрелки) среди `seats` 1..=n.
pub fn seat_before(seat: SeatIndex, seat_count: u8) -> SeatIndex {
    if seat <= 1 {
        seat_count
    } else {
        seat - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chips;

    fn table(seats: &[SeatIndex]) -> Vec<Player> {
        seats
            .iter()
            .map(|&s| Player::new(s as u64 * 10, s, Chips(100)))
            .collect()
    }

    #[test]
    fn clockwise_wraps_and_puts_start_last() {
        let players = table(&[1, 3, 5]);
        assert_eq!(clockwise_from(&players, 3), vec![5, 1, 3]);
        assert_eq!(clockwise_from(&players, 5), vec![1, 3, 5]);
    }

    #[test]
    fn sitting_out_players_are_skipped() {
        let mut players = table(&[1, 2, 3]);
        players[1].sitting_out = true;
        assert_eq!(next_participant(&players, 1), Some(3));
        assert_eq!(next_button(&players, Some(3)), Some(1));
    }

    #[test]
    fn heads_up_button_posts_small_blind() {
        let players = table(&[2, 4]);
        assert_eq!(blind_seats(&players, 4), Some((4, 2)));
        let ring = table(&[1, 2, 3]);
        assert_eq!(blind_seats(&ring, 3), Some((1, 2)));
    }
}
