mod test_rejoin_previous_room;
