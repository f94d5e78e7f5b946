mod dynamics;
mod loading;
mod simulation;
mod trim;
